//! # Generic Clients
//!
//! The capability interface the dispatcher drives, and the closed set of per-encoding
//! implementations behind it.
//!
//! A [`GenericClient`] performs exactly one call over its lifetime, in four steps:
//!
//! 1. **[`GenericClient::init`]**: resolve the method from the configured descriptor
//!    set, validate the metadata and the request body.
//! 2. **[`GenericClient::invoke`]**: perform the unary call. The result is a typed
//!    [`InvokeOutcome`] so the dispatcher never has to inspect error shapes: a
//!    business-status failure reported by the server is distinguished from transport
//!    and server failures by the invoke contract itself.
//! 3. **[`GenericClient::classify_biz_error`]** *or* **[`GenericClient::render_output`]**:
//!    produce the caller-visible output, from the business failure or from the
//!    response respectively. Exactly one of the two runs per call.
//! 4. Accessors ([`GenericClient::response`], [`GenericClient::meta_backward`],
//!    [`GenericClient::output`]): pure reads, callable any number of times afterwards.
//!
//! [`EncodedClient`] is the tagged variant over the implementations, selected from the
//! configured [`EncodingKind`](crate::config::EncodingKind) by
//! [`EncodedClient::from_service`].
pub mod json;
pub mod protobuf;
mod types;

pub use types::*;

use crate::{
    BoxError,
    config::{Config, EncodingKind},
};
use http_body::Body as HttpBody;
use prost_reflect::{DescriptorPool, MethodDescriptor};
use self::json::JsonGenericClient;
use self::protobuf::ProtobufGenericClient;
use std::collections::HashMap;
use std::time::Duration;
use tonic::{metadata::MetadataMap, transport::Channel};

/// The capability set the dispatcher requires from every encoding variant.
#[allow(async_fn_in_trait)]
pub trait GenericClient {
    /// Establishes the schema and request state this variant needs.
    ///
    /// Fails if the configuration is invalid for this variant (bad descriptor set,
    /// unknown service or method, malformed metadata or body).
    async fn init(&mut self, config: &Config) -> Result<(), InitError>;

    /// Performs exactly one unary call using the state set during [`Self::init`].
    ///
    /// On [`InvokeOutcome::Success`] the response is retrievable via [`Self::response`]
    /// after rendering.
    async fn invoke(&mut self) -> InvokeOutcome;

    /// Normalizes a structured business failure and stores it in output-ready form.
    ///
    /// Fails only if the business error itself cannot be parsed.
    fn classify_biz_error(&mut self, biz: BizStatus) -> Result<(), ClassifyError>;

    /// Serializes the held response into the caller-visible output form.
    fn render_output(&mut self) -> Result<(), RenderError>;

    /// The decoded response body, if the call produced one.
    fn response(&self) -> Option<&serde_json::Value>;

    /// The metadata the server sent back with the call.
    fn meta_backward(&self) -> HashMap<String, String>;

    /// The rendered caller-visible output, set by a successful render or a successful
    /// business-failure classification.
    fn output(&self) -> Option<&str>;
}

/// The closed set of generic client variants, one per encoding kind.
pub enum EncodedClient<S = Channel> {
    Json(JsonGenericClient<S>),
    Protobuf(ProtobufGenericClient<S>),
}

impl<S> EncodedClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    /// Selects the variant matching the requested encoding kind.
    ///
    /// An absent kind deliberately falls back to the [`Json`](EncodingKind::Json)
    /// variant rather than failing; permissive selection is a policy decision of this
    /// function, not an error path.
    pub fn from_service(kind: Option<EncodingKind>, service: S) -> Self {
        match kind {
            Some(EncodingKind::Json) => Self::Json(JsonGenericClient::new(service)),
            Some(EncodingKind::Protobuf) => Self::Protobuf(ProtobufGenericClient::new(service)),
            None => Self::Json(JsonGenericClient::new(service)),
        }
    }
}

impl<S> GenericClient for EncodedClient<S>
where
    S: tonic::client::GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn init(&mut self, config: &Config) -> Result<(), InitError> {
        match self {
            Self::Json(client) => client.init(config).await,
            Self::Protobuf(client) => client.init(config).await,
        }
    }

    async fn invoke(&mut self) -> InvokeOutcome {
        match self {
            Self::Json(client) => client.invoke().await,
            Self::Protobuf(client) => client.invoke().await,
        }
    }

    fn classify_biz_error(&mut self, biz: BizStatus) -> Result<(), ClassifyError> {
        match self {
            Self::Json(client) => client.classify_biz_error(biz),
            Self::Protobuf(client) => client.classify_biz_error(biz),
        }
    }

    fn render_output(&mut self) -> Result<(), RenderError> {
        match self {
            Self::Json(client) => client.render_output(),
            Self::Protobuf(client) => client.render_output(),
        }
    }

    fn response(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(client) => client.response(),
            Self::Protobuf(client) => client.response(),
        }
    }

    fn meta_backward(&self) -> HashMap<String, String> {
        match self {
            Self::Json(client) => client.meta_backward(),
            Self::Protobuf(client) => client.meta_backward(),
        }
    }

    fn output(&self) -> Option<&str> {
        match self {
            Self::Json(client) => client.output(),
            Self::Protobuf(client) => client.output(),
        }
    }
}

/// Request state prepared during init and consumed by invoke.
pub(crate) struct PreparedCall<T> {
    pub(crate) method: MethodDescriptor,
    pub(crate) metadata: MetadataMap,
    pub(crate) payload: T,
    pub(crate) timeout: Option<Duration>,
}

/// Resolves the configured `service`/`method` pair against the configured
/// descriptor set.
pub(crate) fn resolve_method(config: &Config) -> Result<MethodDescriptor, InitError> {
    let pool = DescriptorPool::decode(config.descriptor_set.as_slice())?;

    pool.get_service_by_name(&config.service)
        .ok_or_else(|| InitError::ServiceNotFound(config.service.clone()))?
        .methods()
        .find(|m| m.name() == config.method)
        .ok_or_else(|| InitError::MethodNotFound(config.method.clone()))
}
