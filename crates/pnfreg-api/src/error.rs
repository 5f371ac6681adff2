use thiserror::Error;

/// Top-level error type for the `pnfreg-api` crate.
///
/// Covers every failure mode of a single collector interaction:
/// authentication, transport, and non-success collector responses.
/// `pnfreg-core` maps these into per-endpoint send failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Collector rejected the credentials (HTTP 401 / 403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Collector ───────────────────────────────────────────────────
    /// Collector answered with a non-success status.
    ///
    /// `message` carries the VES `requestError` text when the collector
    /// sent one, otherwise a preview of the raw body.
    #[error("Collector error (HTTP {status}): {message}")]
    Collector {
        status: u16,
        message: String,
        message_id: Option<String>,
    },
}
