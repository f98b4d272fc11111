//! # CLI
//!
//! This module defines the command-line interface of `rpcall` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring
//! headers are `key:value` and the body is valid JSON);
use clap::{Parser, ValueEnum};
use rpcall_core::EncodingKind;
use std::path::PathBuf;

/// Perform a single dynamic gRPC call against a server.
///
/// The target schema is resolved at runtime from a compiled descriptor set; nothing
/// is generated at compile time.
///
/// ## Examples:
///
/// ```bash
/// rpcall http://localhost:50051 my.pkg.Service/Method \
///     --body '{"key": "value"}' --descriptor-set ./descriptors.bin
/// ```
#[derive(Parser)]
#[command(name = "rpcall", version, about = "Dynamic gRPC invocation CLI")]
pub struct Cli {
    /// The server URL to connect to (e.g. http://localhost:50051)
    pub url: String,

    /// Endpoint (package.Service/Method)
    #[arg(value_parser = parse_endpoint)]
    pub endpoint: (String, String),

    /// JSON body of the request
    #[arg(long, value_parser = parse_body)]
    pub body: serde_json::Value,

    /// Path to the descriptor set (.bin)
    #[arg(long)]
    pub descriptor_set: PathBuf,

    /// Encoding kind selecting the generic client variant.
    /// When omitted, the dispatcher falls back to its default variant.
    #[arg(long, value_enum)]
    pub encoding: Option<EncodingArg>,

    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Call deadline in seconds, enforced by the call itself
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the metadata the server sent back after a completed call
    #[arg(long)]
    pub meta_backward: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    /// JSON body transcoded to Protobuf on the wire
    Json,
    /// JSON body marshaled to raw Protobuf bytes before the call
    Protobuf,
}

impl From<EncodingArg> for EncodingKind {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Json => EncodingKind::Json,
            EncodingArg::Protobuf => EncodingKind::Protobuf,
        }
    }
}

fn parse_endpoint(value: &str) -> Result<(String, String), String> {
    let (service, method) = value.split_once('/').ok_or_else(|| {
        format!("Invalid endpoint format: '{value}'. Expected 'package.Service/Method'",)
    })?;

    if service.trim().is_empty() || method.trim().is_empty() {
        return Err("Service and Method names cannot be empty".to_string());
    }

    Ok((service.to_string(), method.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| "Format must be 'key:value'".to_string())
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}
