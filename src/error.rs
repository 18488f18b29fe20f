use serde::{Serialize, Deserialize};
use std::fmt;

/// Unified error type for the studytrack crate.
/// All fallible operations return Result<T, TrackerError> instead of String errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerError {
    pub message: String,
    pub stage: String,
    pub model: Option<String>,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl TrackerError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        TrackerError {
            message: message.into(),
            stage: stage.to_string(),
            model: None,
            context: None,
            source: None,
        }
    }

    /// Lookup miss on a keyed mutation (day number or knowledge-point index)
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        TrackerError::new(message, "not_found")
    }

    /// Add model context to the error
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    /// True when this error is a keyed-lookup miss
    pub fn is_not_found(&self) -> bool {
        self.stage == "not_found"
    }
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref model) = self.model {
            write!(f, " (model: {})", model)?;
        }
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<anyhow::Error> for TrackerError {
    fn from(err: anyhow::Error) -> Self {
        TrackerError::new(
            err.to_string(),
            "unknown"
        ).with_source("anyhow")
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<tokio::time::error::Elapsed> for TrackerError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        TrackerError::new(
            "Operation timed out",
            "timeout"
        ).with_source("tokio::time")
    }
}
