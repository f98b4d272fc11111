//! # rpcall CLI Entry Point
//!
//! The main executable for the rpcall tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs
//!    the tracing subscriber (controlled via `RUST_LOG`, written to stderr).
//! 2. **Configuration**: Reads the descriptor-set file and assembles the immutable
//!    call [`Config`].
//! 3. **Execution**: Delegates the call to `rpcall_core::invoke_rpc`.
//! 4. **Presentation**: Prints the rendered output (a response, or a classified
//!    business failure) to standard output, or the classified error to standard error.

mod cli;
mod formatter;

use clap::Parser;
use cli::Cli;
use formatter::{FormattedString, MetaBackward};
use rpcall_core::{Config, GenericClient, invoke_rpc};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    setup_tracing();

    let args = Cli::parse();
    let (service, method) = args.endpoint;

    let descriptor_set = match std::fs::read(&args.descriptor_set) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };
    tracing::debug!(bytes = descriptor_set.len(), "descriptor set loaded");

    let config = Config {
        encoding: args.encoding.map(Into::into),
        endpoint: args.url,
        service,
        method,
        body: args.body.to_string(),
        metadata: args.headers,
        descriptor_set,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };

    match invoke_rpc(&config).await {
        Ok(client) => {
            if let Some(output) = client.output() {
                println!("{}", FormattedString::from(output));
            }
            if args.meta_backward {
                println!("{}", FormattedString::from(MetaBackward(client.meta_backward())));
            }
        }
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

/// Installs the tracing subscriber, filtered through `RUST_LOG` and writing to
/// stderr so stdout stays reserved for call output.
fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
