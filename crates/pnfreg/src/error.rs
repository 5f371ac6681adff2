//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use pnfreg_config::ConfigError;
use pnfreg_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(pnfreg::validation))]
    Validation { field: String, reason: String },

    #[error("Could not build pnfRegistration payload: {message}")]
    #[diagnostic(code(pnfreg::payload))]
    Payload { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Failed to read setting '{path}'")]
    #[diagnostic(
        code(pnfreg::config_read),
        help("{message}\nCheck the config file and PNFREG_* environment variables.")
    )]
    ConfigRead { path: String, message: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(pnfreg::no_config),
        help(
            "Create one with: pnfreg config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(pnfreg::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(pnfreg::config))]
    Config(Box<figment::Error>),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(pnfreg::config_write))]
    ConfigWrite(String),

    // ── Registration ─────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(pnfreg::core))]
    Core(CoreError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(pnfreg::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            Self::ConfigRead { .. } | Self::NoConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigRead { path, message } => CliError::ConfigRead { path, message },

            CoreError::Config { message } => CliError::Validation {
                field: "network_function".into(),
                reason: message,
            },

            CoreError::PayloadBuild { message } => CliError::Payload { message },

            CoreError::EndpointDetailsUnavailable { message } => CliError::Validation {
                field: "ves.endpoint".into(),
                reason: message,
            },

            other => CliError::Core(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            err @ ConfigError::NoCredentials { .. } => CliError::Validation {
                field: "ves.endpoint.password".into(),
                reason: err.to_string(),
            },
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
