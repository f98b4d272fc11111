//! # rpcall Core
//!
//! `rpcall-core` is the foundational library powering the rpcall CLI. It performs a single
//! dynamic gRPC call against any server without compile-time knowledge of the Protobuf
//! schema: the schema is resolved at runtime from a compiled `FileDescriptorSet`.
//!
//! ## Key Components
//!
//! * **[`invoke_rpc`]:** The main entry point. It selects a generic client variant from the
//!   configured encoding kind, drives it through its lifecycle (initialize, invoke,
//!   classify/render) and classifies every failure into the [`CallError`] taxonomy.
//! * **[`Config`]:** The immutable call configuration. The dispatcher interprets only the
//!   encoding kind; everything else is consumed by the generic client implementations.
//! * **[`GenericClient`] & [`EncodedClient`]:** The capability interface required by the
//!   dispatcher and the closed set of per-encoding implementations behind it.
//!
//! ## Internal clients
//!
//! We've decided to expose the transport building blocks that we use internally to perform
//! dynamic gRPC requests, in case consumers want to drive them directly:
//!
//! * **[`grpc::client::GrpcClient`]:** A unary gRPC client generic over the wire codec.
//! * **[`grpc::codec`]:** A JSON transcoding codec and a raw-bytes codec, both driven by
//!   runtime message descriptors.
//!
//! ## Business-status failures
//!
//! A server can report an application-level failure through the `biz-status`,
//! `biz-message` and `biz-extra` trailing-metadata keys. Such a failure is a legitimate
//! call outcome, not an invocation failure: the dispatcher classifies it and returns the
//! live client handle, exactly as it does for a plain success.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod client;
pub mod config;
pub mod dispatch;
pub mod grpc;

pub use client::{EncodedClient, GenericClient};
pub use config::{Config, EncodingKind};
pub use dispatch::{CallError, invoke_rpc};

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
