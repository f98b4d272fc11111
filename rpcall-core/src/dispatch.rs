//! # Dispatcher
//!
//! The orchestration core: select a generic client variant from the configuration,
//! drive it through its lifecycle, and classify every failure into the three-kind
//! [`CallError`] taxonomy.
//!
//! The lifecycle is strictly sequential, with no retries at any stage:
//!
//! ```text
//! select -> init -> invoke -> { classify | render } -> handle returned
//! ```
//!
//! A structured business failure short-circuits the render step entirely: a
//! successful classification already stored the output-ready form, so the handle is
//! returned as a success without rendering. Only a clean invoke success reaches
//! [`GenericClient::render_output`]. That asymmetry is deliberate and relied upon by
//! callers.
use crate::{
    client::{
        ClassifyError, EncodedClient, GenericClient, InitError, InvokeError, InvokeOutcome,
        RenderError,
    },
    config::Config,
};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

/// A failed invocation, classified by the stage that failed.
///
/// Every variant carries its underlying cause; nothing is suppressed or retried.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Initialization failed: a configuration or setup problem, never retryable.
    #[error("Client init failed: '{0}'")]
    Client(#[source] InitError),
    /// The call failed for any reason other than a structured business failure.
    #[error("RPC call failed: '{0}'")]
    Server(#[source] InvokeError),
    /// The outcome could not be turned into caller-visible output.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// The two ways output production can fail.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to parse business error: '{0}'")]
    Classify(#[source] ClassifyError),
    #[error("Failed to render response output: '{0}'")]
    Render(#[source] RenderError),
}

/// Performs one dynamic gRPC call described by `config`.
///
/// Connects to the configured endpoint, selects the generic client variant matching
/// the encoding kind (absent kind falls back to the JSON variant) and drives it
/// through the call lifecycle.
///
/// # Returns
///
/// * `Ok(client)` - The live client handle. Its response, backward metadata and
///   rendered output can be queried. A classified business failure also lands here:
///   it is a legitimate application outcome, not an invocation failure.
/// * `Err(CallError)` - The first stage failure, wrapped with its cause.
pub async fn invoke_rpc(config: &Config) -> Result<EncodedClient, CallError> {
    let channel = connect(&config.endpoint).await.map_err(CallError::Client)?;
    let client = EncodedClient::from_service(config.encoding, channel);

    drive(client, config).await
}

/// Drives an already-selected generic client through the call lifecycle.
///
/// Exposed separately from [`invoke_rpc`] so the state machine can be exercised
/// against any [`GenericClient`] implementation, including in-process test services.
/// The client is owned exclusively for the invocation and handed back on success.
pub async fn drive<C: GenericClient>(mut client: C, config: &Config) -> Result<C, CallError> {
    client.init(config).await.map_err(CallError::Client)?;
    debug!(
        service = %config.service,
        method = %config.method,
        "generic client initialized"
    );

    match client.invoke().await {
        InvokeOutcome::Success => {}
        InvokeOutcome::BusinessFailure(biz) => {
            debug!(code = biz.status_code, "call returned a business failure");
            client
                .classify_biz_error(biz)
                .map_err(|e| CallError::Output(OutputError::Classify(e)))?;
            // Classification already produced the output form; render is skipped.
            return Ok(client);
        }
        InvokeOutcome::TransportFailure(cause) => return Err(CallError::Server(cause)),
    }

    client
        .render_output()
        .map_err(|e| CallError::Output(OutputError::Render(e)))?;

    Ok(client)
}

async fn connect(addr: &str) -> Result<Channel, InitError> {
    let endpoint = Endpoint::new(addr.to_string())
        .map_err(|e| InitError::InvalidUrl(addr.to_string(), e))?;

    endpoint
        .connect()
        .await
        .map_err(|e| InitError::ConnectionFailed(addr.to_string(), e))
}
