use echo_service::EchoService;
use echo_service::pb::{EchoRequest, EchoResponse};
use std::str::FromStr;
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Request, Response, Status};

/// An echo service whose behavior is scripted by the request message:
///
/// * `boom` - fails with a plain internal status.
/// * `biz` - fails with a structured business status in the trailing metadata.
/// * `biz-malformed` - like `biz`, but the `biz-extra` payload is not valid JSON.
/// * anything else - echoes the message back, with an `echo-scope` response header.
pub struct EchoServiceImpl;

fn biz_metadata(extra: &str) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    metadata.insert("biz-status", MetadataValue::from_static("10001"));
    metadata.insert("biz-message", MetadataValue::from_static("order rejected"));
    metadata.insert("biz-extra", MetadataValue::from_str(extra).unwrap());
    metadata
}

#[tonic::async_trait]
impl EchoService for EchoServiceImpl {
    async fn unary_echo(
        &self,
        req: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let message = req.into_inner().message;

        match message.as_str() {
            "boom" => Err(Status::internal("kaboom")),
            "biz" => Err(Status::with_metadata(
                tonic::Code::Internal,
                "business failure",
                biz_metadata(r#"{"reason":"oversold"}"#),
            )),
            "biz-malformed" => Err(Status::with_metadata(
                tonic::Code::Internal,
                "business failure",
                biz_metadata("not json at all"),
            )),
            _ => {
                let mut response = Response::new(EchoResponse { message });
                response
                    .metadata_mut()
                    .insert("echo-scope", MetadataValue::from_static("test"));
                Ok(response)
            }
        }
    }
}
