//! Error types for the digest pipeline.
//!
//! Two families live here:
//! - [`BoundaryError`]: what an external service call (news search, chat completion,
//!   SMTP relay) can fail with. The orchestrator decides how each failure degrades.
//! - [`ConfigError`]: problems found while resolving settings at start-up. These are the
//!   only errors that stop a run before any network traffic happens.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single call to an external boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// The boundary was never configured (for example, no API key).
    #[error("boundary unavailable: {0}")]
    Unavailable(String),

    /// Connection, DNS, TLS or timeout failure, or the body could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered, but not with a usable success payload.
    #[error("upstream error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        /// HTTP or SMTP status code, when one was received.
        status: Option<u16>,
        /// Message reported by the service, or a description of what was wrong.
        message: String,
    },

    /// The service rejected the supplied credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),
}

impl BoundaryError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BoundaryError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs may carry query credentials; never keep them in the message.
        let e = e.without_url();
        if e.is_decode() {
            Self::upstream(e.status().map(|s| s.as_u16()), e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Problems resolving configuration before the pipeline starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("article count must be between 1 and {max}, got {got}")]
    ArticleCount { got: u32, max: u32 },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0} is not set (pass it as a flag, export it, or put it in .env)")]
    MissingSecret(&'static str),
}
