use colored::*;
use rpcall_core::CallError;
use std::collections::HashMap;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// The backward metadata of a completed call, for `--meta-backward` output.
pub struct MetaBackward(pub HashMap<String, String>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<&str> for FormattedString {
    fn from(output: &str) -> Self {
        FormattedString(output.to_string())
    }
}

impl From<CallError> for FormattedString {
    fn from(err: CallError) -> Self {
        let header = match &err {
            CallError::Client(_) => "Client Error:",
            CallError::Server(_) => "Server Error:",
            CallError::Output(_) => "Output Error:",
        };
        FormattedString(format!("{}\n\n'{}'", header.red().bold(), err))
    }
}

impl From<std::io::Error> for FormattedString {
    fn from(err: std::io::Error) -> Self {
        FormattedString(format!(
            "{}\n\n'{}'",
            "Failed to read file:".red().bold(),
            err
        ))
    }
}

impl From<MetaBackward> for FormattedString {
    fn from(MetaBackward(metadata): MetaBackward) -> Self {
        if metadata.is_empty() {
            return FormattedString("No backward metadata received.".yellow().to_string());
        }

        let mut entries: Vec<_> = metadata.into_iter().collect();
        entries.sort();

        let mut out = String::new();
        out.push_str("Backward metadata:\n");
        for (key, value) in entries {
            out.push_str(&format!("  {}: {}\n", key.green(), value));
        }
        FormattedString(out.trim_end().to_string())
    }
}
