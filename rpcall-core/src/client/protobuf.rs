//! # Protobuf Generic Client
//!
//! The generic client for the `Protobuf` encoding kind: the JSON body is marshaled
//! to raw Protobuf bytes eagerly during init, so schema mismatches surface as
//! configuration problems before any network traffic. The wire carries plain bytes
//! through the [`BytesCodec`](crate::grpc::codec::BytesCodec); the response frame is
//! decoded through the output descriptor at invoke time and converted to JSON when
//! the output is rendered.
use super::{
    BizStatus, ClassifyError, GenericClient, InitError, InvokeError, InvokeOutcome, PreparedCall,
    RenderError, metadata_to_map, resolve_method,
};
use crate::{
    BoxError,
    config::Config,
    grpc::{
        client::{GrpcClient, build_metadata},
        codec::BytesCodec,
    },
};
use bytes::Bytes;
use http_body::Body as HttpBody;
use prost::Message;
use prost_reflect::DynamicMessage;
use std::collections::HashMap;
use tonic::transport::Channel;

pub struct ProtobufGenericClient<S = Channel> {
    transport: GrpcClient<S>,
    call: Option<PreparedCall<Bytes>>,
    decoded: Option<DynamicMessage>,
    response: Option<serde_json::Value>,
    meta_backward: HashMap<String, String>,
    output: Option<String>,
}

impl<S> ProtobufGenericClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        Self {
            transport: GrpcClient::new(service),
            call: None,
            decoded: None,
            response: None,
            meta_backward: HashMap::new(),
            output: None,
        }
    }
}

impl<S> GenericClient for ProtobufGenericClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn init(&mut self, config: &Config) -> Result<(), InitError> {
        let method = resolve_method(config)?;
        let metadata = build_metadata(&config.metadata)?;

        let body: serde_json::Value =
            serde_json::from_str(&config.body).map_err(InitError::InvalidBody)?;
        let message = DynamicMessage::deserialize(method.input(), body)
            .map_err(InitError::BodyMismatch)?;
        let payload = Bytes::from(message.encode_to_vec());

        self.call = Some(PreparedCall {
            method,
            metadata,
            payload,
            timeout: config.timeout,
        });
        Ok(())
    }

    async fn invoke(&mut self) -> InvokeOutcome {
        let Some(call) = &self.call else {
            return InvokeOutcome::TransportFailure(InvokeError::NotInitialized);
        };

        let result = self
            .transport
            .unary(
                &call.method,
                BytesCodec,
                call.payload.clone(),
                call.metadata.clone(),
                call.timeout,
            )
            .await;

        match result {
            Ok(Ok(reply)) => match DynamicMessage::decode(call.method.output(), reply.body) {
                Ok(message) => {
                    self.meta_backward = metadata_to_map(&reply.metadata);
                    self.decoded = Some(message);
                    InvokeOutcome::Success
                }
                Err(err) => InvokeOutcome::TransportFailure(InvokeError::Decode(err)),
            },
            Ok(Err(status)) => match BizStatus::from_status(&status) {
                Some(biz) => {
                    self.meta_backward = metadata_to_map(status.metadata());
                    InvokeOutcome::BusinessFailure(biz)
                }
                None => InvokeOutcome::TransportFailure(InvokeError::Status(status)),
            },
            Err(err) => InvokeOutcome::TransportFailure(InvokeError::Transport(err)),
        }
    }

    fn classify_biz_error(&mut self, biz: BizStatus) -> Result<(), ClassifyError> {
        let value = biz.classify()?;
        self.output =
            Some(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()));
        Ok(())
    }

    fn render_output(&mut self) -> Result<(), RenderError> {
        if let Some(decoded) = self.decoded.as_ref() {
            let value = serde_json::to_value(decoded).map_err(RenderError::Serialize)?;
            let rendered = serde_json::to_string_pretty(&value).map_err(RenderError::Serialize)?;
            self.response = Some(value);
            self.output = Some(rendered);
            return Ok(());
        }
        // A classified business failure is already in output-ready form.
        if self.output.is_some() {
            return Ok(());
        }
        Err(RenderError::MissingResponse)
    }

    fn response(&self) -> Option<&serde_json::Value> {
        // Only populated once the output has been rendered; the raw decoded
        // message is this variant's source of truth until then.
        self.response.as_ref()
    }

    fn meta_backward(&self) -> HashMap<String, String> {
        self.meta_backward.clone()
    }

    fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}
