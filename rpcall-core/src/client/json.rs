//! # JSON Generic Client
//!
//! The generic client for the `Json` encoding kind: the request body stays a
//! `serde_json::Value` all the way to the wire, where the
//! [`JsonCodec`](crate::grpc::codec::JsonCodec) transcodes it against the input
//! message descriptor. The response arrives already converted back to JSON.
use super::{
    BizStatus, ClassifyError, GenericClient, InitError, InvokeError, InvokeOutcome, PreparedCall,
    RenderError, metadata_to_map, resolve_method,
};
use crate::{
    BoxError,
    config::Config,
    grpc::{
        client::{GrpcClient, build_metadata},
        codec::JsonCodec,
    },
};
use http_body::Body as HttpBody;
use std::collections::HashMap;
use tonic::transport::Channel;

pub struct JsonGenericClient<S = Channel> {
    transport: GrpcClient<S>,
    call: Option<PreparedCall<serde_json::Value>>,
    response: Option<serde_json::Value>,
    meta_backward: HashMap<String, String>,
    output: Option<String>,
}

impl<S> JsonGenericClient<S>
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
            response: None,
            meta_backward: HashMap::new(),
            output: None,
        }
    }
}

impl<S> GenericClient for JsonGenericClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn init(&mut self, config: &Config) -> Result<(), InitError> {
        let method = resolve_method(config)?;
        let metadata = build_metadata(&config.metadata)?;
        let payload: serde_json::Value =
            serde_json::from_str(&config.body).map_err(InitError::InvalidBody)?;

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

        let codec = JsonCodec::new(call.method.input(), call.method.output());
        let result = self
            .transport
            .unary(
                &call.method,
                codec,
                call.payload.clone(),
                call.metadata.clone(),
                call.timeout,
            )
            .await;

        match result {
            Ok(Ok(reply)) => {
                self.meta_backward = metadata_to_map(&reply.metadata);
                self.response = Some(reply.body);
                InvokeOutcome::Success
            }
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
        if let Some(response) = self.response.as_ref() {
            let rendered =
                serde_json::to_string_pretty(response).map_err(RenderError::Serialize)?;
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
        self.response.as_ref()
    }

    fn meta_backward(&self) -> HashMap<String, String> {
        self.meta_backward.clone()
    }

    fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }
}
