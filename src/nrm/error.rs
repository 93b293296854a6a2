// ABOUTME: Errors from talking to the OESS control API.
// ABOUTME: Separates transport, HTTP status, decoding and timeout failures.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NrmError {
    #[error("invalid control URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("credentials rejected by NRM (HTTP {0})")]
    Unauthorized(u16),

    #[error("NRM returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode NRM response for {action}: {reason}")]
    Decode { action: &'static str, reason: String },

    #[error("NRM reported an error for {action}: {message}")]
    Remote {
        action: &'static str,
        message: String,
    },

    #[error("{action} timed out after {timeout:?}")]
    Timeout {
        action: &'static str,
        timeout: Duration,
    },
}

pub type Result<T> = std::result::Result<T, NrmError>;
