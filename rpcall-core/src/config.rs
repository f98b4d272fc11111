//! # Call Configuration
//!
//! The immutable input of a single invocation. A [`Config`] is produced by the caller
//! (the CLI, or a consumer of this library) and handed to [`crate::invoke_rpc`].
//!
//! The dispatcher itself reads nothing but [`Config::encoding`]; every other field is
//! interpreted by the generic client implementations during initialization.
use std::time::Duration;

/// The wire-format family of the request payload, selecting which generic client
/// variant handles the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingKind {
    /// The body is JSON text, transcoded to Protobuf on the wire.
    Json,
    /// The body is JSON text, marshaled to raw Protobuf bytes before the call.
    Protobuf,
}

/// All the information needed to perform one dynamic gRPC call.
///
/// Immutable once built; owned by the caller; lives for exactly one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// The encoding kind. `None` means "let the dispatcher pick the default variant";
    /// see [`crate::EncodedClient::from_service`] for the fallback policy.
    pub encoding: Option<EncodingKind>,
    /// The server URI (e.g. `http://localhost:50051`).
    pub endpoint: String,
    /// Fully qualified service name (e.g. `my.package.Service`).
    pub service: String,
    /// Method name (e.g. `SayHello`).
    pub method: String,
    /// The request payload, interpreted according to the encoding kind.
    pub body: String,
    /// Custom gRPC metadata (headers) to attach to the request.
    pub metadata: Vec<(String, String)>,
    /// An encoded `FileDescriptorSet` describing the target service.
    pub descriptor_set: Vec<u8>,
    /// Call deadline. Enforcement is delegated to the generic client's invoke step;
    /// the dispatcher owns no timeout of its own.
    pub timeout: Option<Duration>,
}
