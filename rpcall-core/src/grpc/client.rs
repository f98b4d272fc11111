//! # Unary gRPC Client
//!
//! A thin wrapper over `tonic::client::Grpc` providing the single call shape this
//! crate needs: one unary request, one response.
//!
//! The wrapper is agnostic to the messages being exchanged; it is generic over the
//! wire codec, so the same transport drives both the JSON-transcoding and the
//! raw-bytes encodings. It constructs the HTTP/2 path (e.g. `/package.Service/Method`)
//! at runtime from the method descriptor, attaches the caller's metadata, applies the
//! configured deadline, and captures the metadata the server sends back alongside the
//! response body.
use crate::BoxError;
use http_body::Body as HttpBody;
use prost_reflect::MethodDescriptor;
use std::str::FromStr;
use std::time::Duration;
use tonic::{
    client::GrpcService,
    codec::Codec,
    metadata::{
        MetadataKey, MetadataMap, MetadataValue,
        errors::{InvalidMetadataKey, InvalidMetadataValue},
    },
    transport::Channel,
};

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Internal error, the client was not ready: '{0}'")]
    ClientNotReady(#[source] BoxError),
}

/// Errors building a `MetadataMap` from user-supplied header pairs.
#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    InvalidKey {
        key: String,
        source: InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    InvalidValue {
        key: String,
        source: InvalidMetadataValue,
    },
}

/// A unary response body together with the metadata the server sent back.
#[derive(Debug)]
pub struct Reply<T> {
    pub body: T,
    pub metadata: MetadataMap,
}

/// A generic unary gRPC client.
pub struct GrpcClient<S = Channel> {
    client: tonic::client::Grpc<S>,
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = tonic::client::Grpc::new(service);
        Self { client }
    }

    /// Performs a unary gRPC call (Single Request -> Single Response).
    ///
    /// # Returns
    /// * `Ok(Ok(Reply))` - Successful RPC execution.
    /// * `Ok(Err(Status))` - RPC executed, but server returned an error.
    /// * `Err(TransportError)` - Failed to send request or connect.
    pub async fn unary<C>(
        &mut self,
        method: &MethodDescriptor,
        codec: C,
        payload: C::Encode,
        metadata: MetadataMap,
        timeout: Option<Duration>,
    ) -> Result<Result<Reply<C::Decode>, tonic::Status>, TransportError>
    where
        C: Codec,
        C::Encode: Send + Sync + 'static,
        C::Decode: Send + Sync + 'static,
    {
        self.client
            .ready()
            .await
            .map_err(|e| TransportError::ClientNotReady(e.into()))?;

        let path = http_path(method);
        let mut request = tonic::Request::new(payload);
        *request.metadata_mut() = metadata;
        if let Some(timeout) = timeout {
            request.set_timeout(timeout);
        }

        match self.client.unary(request, path, codec).await {
            Ok(response) => {
                let (metadata, body, _extensions) = response.into_parts();
                Ok(Ok(Reply { body, metadata }))
            }
            Err(status) => Ok(Err(status)),
        }
    }
}

fn http_path(method: &MethodDescriptor) -> http::uri::PathAndQuery {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    http::uri::PathAndQuery::from_str(&path).expect("valid gRPC path")
}

/// Builds a `MetadataMap` from `key:value` pairs, validating both sides.
pub fn build_metadata(pairs: &[(String, String)]) -> Result<MetadataMap, MetadataError> {
    let mut metadata = MetadataMap::new();
    for (k, v) in pairs {
        let key = MetadataKey::from_str(k).map_err(|source| MetadataError::InvalidKey {
            key: k.clone(),
            source,
        })?;
        let val = MetadataValue::from_str(v).map_err(|source| MetadataError::InvalidValue {
            key: k.clone(),
            source,
        })?;
        metadata.insert(key, val);
    }
    Ok(metadata)
}
