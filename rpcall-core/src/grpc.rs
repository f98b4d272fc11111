//! # Generic gRPC Transport
//!
//! Low-level building blocks for performing a dynamic gRPC call.
//!
//! Unlike standard `tonic` clients which are strongly typed (e.g., `HelloRequest`),
//! the components here work from runtime message descriptors: payloads are either
//! `serde_json::Value` structures transcoded on the fly, or raw Protobuf bytes
//! marshaled ahead of the call.
pub mod client;
pub mod codec;
