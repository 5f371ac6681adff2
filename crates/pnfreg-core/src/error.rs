// ── Core error types ──
//
// Domain errors from pnfreg-core. Collector transport details are folded
// into a handful of variants by the `From<pnfreg_api::Error>` impl so the
// dispatch loop can log one line per failed endpoint.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    /// Reading a setting failed for a reason other than "not found".
    #[error("Failed to read setting '{path}': {message}")]
    ConfigRead { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Payload errors ───────────────────────────────────────────────
    #[error("Failed to build pnfRegistration payload: {message}")]
    PayloadBuild { message: String },

    #[error("VES endpoint details unavailable: {message}")]
    EndpointDetailsUnavailable { message: String },

    // ── Send errors ──────────────────────────────────────────────────
    /// The HTTP client could not be built (unreadable CA, TLS backend).
    #[error("Cannot set up collector client: {message}")]
    ClientSetup { message: String },

    #[error("Cannot connect to collector at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Collector authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The request hit `transport.timeout`.
    #[error("Collector request timed out")]
    Timeout,

    #[error("Collector rejected event: {message}")]
    Collector {
        message: String,
        /// VES `messageId` (e.g. "SVC0002"), when the collector sent one.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::PayloadBuild {
            message: format!("serialization failed: {err}"),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pnfreg_api::Error> for CoreError {
    fn from(err: pnfreg_api::Error) -> Self {
        match err {
            pnfreg_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            pnfreg_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Collector {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            pnfreg_api::Error::Tls(message) => CoreError::ClientSetup { message },
            pnfreg_api::Error::Collector {
                status,
                message,
                message_id,
            } => CoreError::Collector {
                message,
                code: message_id,
                status: Some(status),
            },
        }
    }
}
