//! Config subcommand handlers.

use std::fmt::Write;

use pnfreg_config::{self as config, Config, KEYRING_PASSWORD_ENTRY, KEYRING_SERVICE};

use super::config_file;
use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config_file(global).display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => show(global),
        ConfigCommand::Init { force } => init(global, force),
        ConfigCommand::SetPassword => set_password(global),
    }
}

// ── Show ────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    if !path.exists() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }

    let cfg = config::load_config(&path)?;
    let rendered = match global.output {
        OutputFormat::Text => format_config_redacted(&cfg),
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&cfg)?;
            if let Some(pw) = value.pointer_mut("/ves/endpoint/password") {
                if !pw.is_null() {
                    *pw = "****".into();
                }
            }
            output::render_json(&value)?
        }
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Format config for display, masking the collector password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[ves]");
    if let Some(enabled) = cfg.ves.pnf_registration {
        let _ = writeln!(out, "pnf_registration = {enabled}");
    }

    let ep = &cfg.ves.endpoint;
    let _ = writeln!(out);
    let _ = writeln!(out, "[ves.endpoint]");
    let _ = writeln!(out, "protocol = \"{}\"", ep.protocol);
    let _ = writeln!(out, "ip = \"{}\"", ep.ip);
    let _ = writeln!(out, "port = {}", ep.port);
    let _ = writeln!(out, "auth_method = \"{}\"", ep.auth_method);
    if let Some(ref u) = ep.username {
        let _ = writeln!(out, "username = \"{u}\"");
    }
    if ep.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }
    if let Some(ref env) = ep.password_env {
        let _ = writeln!(out, "password_env = \"{env}\"");
    }

    let nf = &cfg.network_function;
    let _ = writeln!(out);
    let _ = writeln!(out, "[network_function]");
    let _ = writeln!(
        out,
        "mount_point_addressing_method = \"{}\"",
        cfg.addressing_method()
    );
    let _ = writeln!(out, "hostname = \"{}\"", nf.hostname);
    let _ = writeln!(out, "host_ip = \"{}\"", nf.host_ip);
    let _ = writeln!(out, "host_base_port = {}", nf.host_base_port);
    let _ = writeln!(out, "ip_v4 = \"{}\"", nf.ip_v4);
    let _ = writeln!(out, "ip_v6 = \"{}\"", nf.ip_v6);
    let _ = writeln!(out, "ip_v6_enabled = {}", nf.ip_v6_enabled);
    let _ = writeln!(out, "ssh_connections = {}", nf.ssh_connections);
    let _ = writeln!(out, "tls_connections = {}", nf.tls_connections);

    let tr = &cfg.transport;
    let _ = writeln!(out);
    let _ = writeln!(out, "[transport]");
    let _ = writeln!(out, "timeout = {}", tr.timeout);
    if let Some(insecure) = tr.insecure {
        let _ = writeln!(out, "insecure = {insecure}");
    }
    if let Some(ref ca) = tr.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }

    out
}

// ── Init ────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts, force: bool) -> Result<(), CliError> {
    let path = config_file(global);
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let mut cfg = Config::default();
    cfg.ves.pnf_registration = Some(true);
    cfg.ves.endpoint.username = Some("sample1".into());
    config::save_config(&cfg, &path)?;

    output::print_output(
        &format!(
            "Wrote {}\nEdit [ves.endpoint] and [network_function], then run: pnfreg config set-password",
            path.display()
        ),
        global.quiet,
    );
    Ok(())
}

// ── Set password ────────────────────────────────────────────────────

fn keyring_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    }
}

fn set_password(global: &GlobalOpts) -> Result<(), CliError> {
    let password = rpassword::prompt_password("Collector password: ").map_err(|e| {
        CliError::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {e}"),
        }
    })?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_PASSWORD_ENTRY).map_err(keyring_err)?;
    entry.set_password(&password).map_err(keyring_err)?;

    output::print_output("Collector password stored in the system keyring", global.quiet);
    Ok(())
}
