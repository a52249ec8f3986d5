//! Error types

use crate::snapshot::Metric;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to write a trace file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write trace to {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure to read a single counter from a metrics source.
///
/// The sampler never propagates these; it substitutes the last-known value
/// and records the metric as stale instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SampleError {
    #[error("{metric} unreadable: {reason}")]
    Unreadable { metric: Metric, reason: String },

    #[error("{metric} read timed out")]
    Timeout { metric: Metric },

    #[error("{metric} is not provided by this source")]
    Unsupported { metric: Metric },
}

impl SampleError {
    pub fn unreadable(metric: Metric, reason: impl Into<String>) -> Self {
        SampleError::Unreadable {
            metric,
            reason: reason.into(),
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            SampleError::Unreadable { metric, .. }
            | SampleError::Timeout { metric }
            | SampleError::Unsupported { metric } => *metric,
        }
    }

    /// Whether a value substituted for this failure should be flagged stale.
    pub fn marks_stale(&self) -> bool {
        !matches!(self, SampleError::Unsupported { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoopError {
    #[error("cannot move collection loop from {from} to {to}")]
    InvalidTransition {
        from: crate::session::LoopState,
        to: crate::session::LoopState,
    },
}
