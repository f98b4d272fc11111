use crate::grpc::client::MetadataError;
use std::collections::HashMap;
use tonic::metadata::{KeyAndValueRef, MetadataMap};

/// Trailing-metadata keys a server uses to report an application-level failure.
///
/// A status carrying a parsable `biz-status` value is a business failure: a valid
/// call outcome with application semantics, not a transport or server failure.
const BIZ_STATUS_KEY: &str = "biz-status";
const BIZ_MESSAGE_KEY: &str = "biz-message";
const BIZ_EXTRA_KEY: &str = "biz-extra";

/// The result of a single invoke attempt.
///
/// The variants are the classification the dispatcher branches on; no error-shape
/// inspection happens outside the client that produced the outcome.
#[derive(Debug)]
pub enum InvokeOutcome {
    /// The call completed and a response was stored.
    Success,
    /// The server reported a structured business failure.
    BusinessFailure(BizStatus),
    /// Transport failure, deadline, or any non-business error status.
    TransportFailure(InvokeError),
}

/// A structured application-level failure reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BizStatus {
    pub status_code: i32,
    pub message: String,
    /// Raw `biz-extra` payload, a JSON map when present. Parsed during
    /// classification, not during recognition.
    pub extra: Option<String>,
}

impl BizStatus {
    /// Recognizes a business failure in an error status by its trailing metadata.
    ///
    /// Returns `None` when the `biz-status` key is absent or not a valid integer;
    /// such statuses stay on the server-error path.
    pub fn from_status(status: &tonic::Status) -> Option<Self> {
        let status_code = status
            .metadata()
            .get(BIZ_STATUS_KEY)?
            .to_str()
            .ok()?
            .parse::<i32>()
            .ok()?;

        let message = status
            .metadata()
            .get(BIZ_MESSAGE_KEY)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let extra = status
            .metadata()
            .get(BIZ_EXTRA_KEY)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Some(Self {
            status_code,
            message,
            extra,
        })
    }

    /// Normalizes this failure into its output-ready JSON form.
    ///
    /// Fails only if the `extra` payload is present but is not a JSON object.
    pub fn classify(&self) -> Result<serde_json::Value, ClassifyError> {
        let extra = match &self.extra {
            Some(raw) => serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw)
                .map(serde_json::Value::Object)
                .map_err(ClassifyError::InvalidExtra)?,
            None => serde_json::Value::Null,
        };

        Ok(serde_json::json!({
            "biz_status": self.status_code,
            "biz_message": self.message,
            "biz_extra": extra,
        }))
    }
}

/// Errors that can occur while initializing a generic client.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] tonic::transport::Error),
    #[error("Failed to connect to '{0}': {1}")]
    ConnectionFailed(String, #[source] tonic::transport::Error),
    #[error("Failed to decode file descriptor set: '{0}'")]
    Descriptor(#[from] prost_reflect::DescriptorError),
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
    #[error("Method '{0}' not found")]
    MethodNotFound(String),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("Invalid request body: '{0}'")]
    InvalidBody(#[source] serde_json::Error),
    #[error("Request body does not match the input message schema: '{0}'")]
    BodyMismatch(#[source] serde_json::Error),
}

/// Non-business failures of the invoke step.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("Invoke called before init")]
    NotInitialized,
    #[error("Transport failed before a response was received: '{0}'")]
    Transport(#[from] crate::grpc::client::TransportError),
    #[error("The server returned an error status: '{0}'")]
    Status(tonic::Status),
    #[error("Failed to decode the response message: '{0}'")]
    Decode(#[from] prost::DecodeError),
}

/// Errors normalizing a recognized business failure.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Invalid biz-extra payload: '{0}'")]
    InvalidExtra(#[source] serde_json::Error),
}

/// Errors serializing the held response into output form.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("No response available to render")]
    MissingResponse,
    #[error("Failed to serialize the response: '{0}'")]
    Serialize(#[source] serde_json::Error),
}

/// Flattens ASCII metadata entries into a plain string map. Binary entries are
/// skipped; the raw bytes have no caller-visible text form.
pub(crate) fn metadata_to_map(metadata: &MetadataMap) -> HashMap<String, String> {
    metadata
        .iter()
        .filter_map(|entry| match entry {
            KeyAndValueRef::Ascii(key, value) => value
                .to_str()
                .ok()
                .map(|v| (key.to_string(), v.to_string())),
            KeyAndValueRef::Binary(..) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tonic::metadata::MetadataValue;

    fn biz_metadata(code: &str, message: &str, extra: Option<&str>) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        metadata.insert(BIZ_STATUS_KEY, MetadataValue::from_str(code).unwrap());
        metadata.insert(BIZ_MESSAGE_KEY, MetadataValue::from_str(message).unwrap());
        if let Some(extra) = extra {
            metadata.insert(BIZ_EXTRA_KEY, MetadataValue::from_str(extra).unwrap());
        }
        metadata
    }

    #[test]
    fn recognizes_business_status_in_trailing_metadata() {
        let status = tonic::Status::with_metadata(
            tonic::Code::Internal,
            "application failure",
            biz_metadata("10001", "order rejected", Some(r#"{"reason":"oversold"}"#)),
        );

        let biz = BizStatus::from_status(&status).unwrap();
        assert_eq!(biz.status_code, 10001);
        assert_eq!(biz.message, "order rejected");
        assert_eq!(biz.extra.as_deref(), Some(r#"{"reason":"oversold"}"#));
    }

    #[test]
    fn plain_status_is_not_a_business_failure() {
        let status = tonic::Status::unavailable("connection reset");
        assert!(BizStatus::from_status(&status).is_none());
    }

    #[test]
    fn unparsable_status_code_is_not_a_business_failure() {
        let status = tonic::Status::with_metadata(
            tonic::Code::Internal,
            "bad trailer",
            biz_metadata("not-a-number", "whatever", None),
        );
        assert!(BizStatus::from_status(&status).is_none());
    }

    #[test]
    fn classification_parses_extra_into_object() {
        let biz = BizStatus {
            status_code: 7,
            message: "rejected".to_string(),
            extra: Some(r#"{"k":"v"}"#.to_string()),
        };

        let value = biz.classify().unwrap();
        assert_eq!(value["biz_status"], 7);
        assert_eq!(value["biz_message"], "rejected");
        assert_eq!(value["biz_extra"]["k"], "v");
    }

    #[test]
    fn classification_without_extra_yields_null() {
        let biz = BizStatus {
            status_code: 7,
            message: "rejected".to_string(),
            extra: None,
        };

        let value = biz.classify().unwrap();
        assert!(value["biz_extra"].is_null());
    }

    #[test]
    fn classification_fails_on_malformed_extra() {
        let biz = BizStatus {
            status_code: 7,
            message: "rejected".to_string(),
            extra: Some("not json".to_string()),
        };

        assert!(matches!(
            biz.classify(),
            Err(ClassifyError::InvalidExtra(_))
        ));
    }
}
