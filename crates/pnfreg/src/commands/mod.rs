//! Subcommand handlers.

pub mod config_cmd;
pub mod payload;
pub mod register;

use std::path::PathBuf;

use crate::cli::GlobalOpts;

/// `--config` / `PNFREG_CONFIG`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(pnfreg_config::config_path)
}
