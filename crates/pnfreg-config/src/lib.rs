//! Configuration for the pnfreg registrar.
//!
//! TOML file + `PNFREG_` environment layers, collector credential
//! resolution (env + keyring + plaintext), and the figment-backed
//! [`FigmentSettings`] that the registrar reads its settings through.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    error::Kind,
    providers::{Env, Format, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::warn;

use pnfreg_api::CollectorAuth;
use pnfreg_core::{
    AddressingMethod, CollectorConfig, CoreError, NetworkFunctionEnv, SettingsSource,
    TlsVerification, VesEndpointDetails,
};

/// Prefix of environment overrides; `__` separates nesting levels.
pub const ENV_PREFIX: &str = "PNFREG_";

/// Keyring service and entry holding the collector password.
pub const KEYRING_SERVICE: &str = "pnfreg";
pub const KEYRING_PASSWORD_ENTRY: &str = "ves/password";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for collector user '{username}'")]
    NoCredentials { username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ves: Ves,

    #[serde(default)]
    pub network_function: NetworkFunction,

    #[serde(default)]
    pub transport: Transport,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Ves {
    /// Send pnfRegistration events at startup. Absent means disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnf_registration: Option<bool>,

    #[serde(default)]
    pub endpoint: VesEndpoint,
}

/// How the collector authenticates requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Deserialize, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    NoAuth,
    BasicAuth,
}

/// VES collector location and credentials.
#[derive(Debug, Deserialize, Serialize)]
pub struct VesEndpoint {
    /// "http" or "https".
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default = "default_collector_ip")]
    pub ip: String,

    #[serde(default = "default_collector_port")]
    pub port: u16,

    #[serde(default = "default_auth_method")]
    pub auth_method: AuthMethod,

    pub username: Option<String>,

    /// Plaintext password; keyring or `password_env` take precedence.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

impl Default for VesEndpoint {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            ip: default_collector_ip(),
            port: default_collector_port(),
            auth_method: default_auth_method(),
            username: None,
            password: None,
            password_env: None,
        }
    }
}

fn default_protocol() -> String {
    "https".into()
}
fn default_collector_ip() -> String {
    "172.17.0.1".into()
}
fn default_collector_port() -> u16 {
    30417
}
fn default_auth_method() -> AuthMethod {
    AuthMethod::BasicAuth
}

/// Facts about the simulated network function.
#[derive(Debug, Deserialize, Serialize)]
pub struct NetworkFunction {
    /// "docker-mapping" or "host-mapping".
    pub mount_point_addressing_method: Option<String>,

    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default)]
    pub host_ip: String,

    #[serde(default)]
    pub host_base_port: u16,

    #[serde(default)]
    pub ip_v4: String,

    #[serde(default)]
    pub ip_v6: String,

    #[serde(default)]
    pub ip_v6_enabled: bool,

    #[serde(default = "default_ssh_connections")]
    pub ssh_connections: u16,

    #[serde(default)]
    pub tls_connections: u16,
}

impl Default for NetworkFunction {
    fn default() -> Self {
        Self {
            mount_point_addressing_method: None,
            hostname: default_hostname(),
            host_ip: String::new(),
            host_base_port: 0,
            ip_v4: String::new(),
            ip_v6: String::new(),
            ip_v6_enabled: false,
            ssh_connections: default_ssh_connections(),
            tls_connections: 0,
        }
    }
}

fn default_hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".into())
}
fn default_ssh_connections() -> u16 {
    1
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Transport {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed collector certificates.
    pub insecure: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            insecure: None,
            ca_cert: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "pnfreg", "pnfreg").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pnfreg");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// File + environment layers, without extracting.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment(path).extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the collector password: `password_env` → keyring → plaintext.
pub fn resolve_password(endpoint: &VesEndpoint) -> Result<SecretString, ConfigError> {
    // 1. Endpoint's password_env → env var lookup
    if let Some(ref env_name) = endpoint.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_PASSWORD_ENTRY) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = endpoint.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: endpoint.username.clone().unwrap_or_default(),
    })
}

/// Resolve the collector credentials for the configured auth method.
pub fn resolve_auth(endpoint: &VesEndpoint) -> Result<CollectorAuth, ConfigError> {
    match endpoint.auth_method {
        AuthMethod::NoAuth => Ok(CollectorAuth::None),
        AuthMethod::BasicAuth => {
            let username = endpoint
                .username
                .clone()
                .ok_or_else(|| ConfigError::Validation {
                    field: "ves.endpoint.username".into(),
                    reason: "basic-auth requires a username".into(),
                })?;
            let password = resolve_password(endpoint)?;
            Ok(CollectorAuth::basic(username, password))
        }
    }
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    pub fn network_function_env(&self) -> NetworkFunctionEnv {
        let nf = &self.network_function;
        NetworkFunctionEnv {
            hostname: nf.hostname.clone(),
            host_ip: nf.host_ip.clone(),
            host_base_port: nf.host_base_port,
            ip_v4: nf.ip_v4.clone(),
            ip_v6: nf.ip_v6.clone(),
            ip_v6_enabled: nf.ip_v6_enabled,
            ssh_connections: nf.ssh_connections,
            tls_connections: nf.tls_connections,
        }
    }

    pub fn collector_config(&self) -> CollectorConfig {
        let transport = &self.transport;
        let tls = match (transport.insecure, &transport.ca_cert) {
            // Unset means lab collectors with self-signed certificates.
            (Some(true), _) | (None, None) => TlsVerification::DangerAcceptInvalid,
            (_, Some(ca_path)) => TlsVerification::CustomCa(ca_path.clone()),
            (Some(false), None) => TlsVerification::SystemDefaults,
        };

        CollectorConfig {
            tls,
            timeout: Duration::from_secs(transport.timeout),
        }
    }

    /// Parsed addressing method, falling back to the default on bad input.
    pub fn addressing_method(&self) -> AddressingMethod {
        match self.network_function.mount_point_addressing_method.as_deref() {
            None => AddressingMethod::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = raw, "unknown mount-point addressing method, using default");
                AddressingMethod::default()
            }),
        }
    }
}

// ── Settings store ──────────────────────────────────────────────────

/// Settings backed by the loaded figment layers.
///
/// Individual keys are looked up against the figment so a missing key can
/// be told apart from a malformed one.
pub struct FigmentSettings {
    figment: Figment,
    config: Config,
}

impl FigmentSettings {
    pub fn new(figment: Figment) -> Result<Self, ConfigError> {
        let config = figment.extract()?;
        Ok(Self { figment, config })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::new(figment(path))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl SettingsSource for FigmentSettings {
    fn get_bool(&self, path: &str) -> Result<Option<bool>, CoreError> {
        match self.figment.extract_inner::<bool>(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if matches!(e.kind, Kind::MissingField(_)) => Ok(None),
            Err(e) => Err(CoreError::ConfigRead {
                path: path.to_owned(),
                message: e.to_string(),
            }),
        }
    }

    fn addressing_method(&self) -> AddressingMethod {
        self.config.addressing_method()
    }

    fn ves_endpoint_details(&self) -> Result<VesEndpointDetails, CoreError> {
        let endpoint = &self.config.ves.endpoint;
        let auth = resolve_auth(endpoint).map_err(|e| CoreError::EndpointDetailsUnavailable {
            message: e.to_string(),
        })?;
        VesEndpointDetails::from_parts(&endpoint.protocol, &endpoint.ip, endpoint.port, auth)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    fn settings_in(jail: &Jail) -> FigmentSettings {
        FigmentSettings::load(&jail.directory().join("config.toml")).unwrap()
    }

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let settings = settings_in(jail);
            let cfg = settings.config();
            assert_eq!(cfg.ves.endpoint.port, 30417);
            assert_eq!(cfg.ves.endpoint.auth_method, AuthMethod::BasicAuth);
            assert_eq!(cfg.network_function.ssh_connections, 1);
            assert_eq!(cfg.transport.timeout, 30);
            assert_eq!(
                settings.get_bool("ves.pnf_registration").unwrap(),
                None,
                "absent flag must read as not found"
            );
            assert_eq!(settings.addressing_method(), AddressingMethod::DockerMapping);
            Ok(())
        });
    }

    #[test]
    fn flag_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [ves]
                pnf_registration = true
                "#,
            )?;
            let settings = settings_in(jail);
            assert_eq!(settings.get_bool("ves.pnf_registration").unwrap(), Some(true));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [ves]
                pnf_registration = true

                [network_function]
                tls_connections = 1
                "#,
            )?;
            jail.set_env("PNFREG_VES__PNF_REGISTRATION", "false");
            jail.set_env("PNFREG_NETWORK_FUNCTION__TLS_CONNECTIONS", "4");

            let settings = settings_in(jail);
            assert_eq!(settings.get_bool("ves.pnf_registration").unwrap(), Some(false));
            assert_eq!(settings.config().network_function.tls_connections, 4);
            Ok(())
        });
    }

    #[test]
    fn malformed_flag_is_a_read_error() {
        let settings = FigmentSettings {
            figment: Figment::new().merge(Toml::string(
                r#"
                [ves]
                pnf_registration = "sometimes"
                "#,
            )),
            config: Config::default(),
        };
        let err = settings.get_bool("ves.pnf_registration").unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn host_mapping_and_network_facts() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [network_function]
                mount_point_addressing_method = "host-mapping"
                hostname = "sim1"
                host_ip = "192.168.1.20"
                host_base_port = 50000
                ip_v4 = "10.10.1.1"
                ssh_connections = 2
                tls_connections = 3
                "#,
            )?;
            let settings = settings_in(jail);
            assert_eq!(settings.addressing_method(), AddressingMethod::HostMapping);

            let env = settings.config().network_function_env();
            assert_eq!(env.hostname, "sim1");
            assert_eq!(env.host_base_port, 50000);
            assert_eq!((env.ssh_connections, env.tls_connections), (2, 3));
            Ok(())
        });
    }

    #[test]
    fn unknown_addressing_method_falls_back() {
        let mut cfg = Config::default();
        cfg.network_function.mount_point_addressing_method = Some("bridge".into());
        assert_eq!(cfg.addressing_method(), AddressingMethod::DockerMapping);
    }

    #[test]
    fn endpoint_details_with_env_password() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [ves.endpoint]
                protocol = "http"
                ip = "10.0.0.5"
                port = 8080
                username = "sample1"
                password_env = "TEST_VES_PASSWORD"
                password = "plaintext"
                "#,
            )?;
            jail.set_env("TEST_VES_PASSWORD", "from-env");

            let details = settings_in(jail).ves_endpoint_details().unwrap();
            assert_eq!(details.url.as_str(), "http://10.0.0.5:8080/eventListener/v7");
            match details.auth {
                CollectorAuth::Basic { username, password } => {
                    assert_eq!(username, "sample1");
                    assert_eq!(password.expose_secret(), "from-env");
                }
                CollectorAuth::None => panic!("expected basic auth"),
            }
            Ok(())
        });
    }

    #[test]
    fn no_auth_needs_no_credentials() {
        let endpoint = VesEndpoint {
            auth_method: AuthMethod::NoAuth,
            ..VesEndpoint::default()
        };
        assert!(matches!(resolve_auth(&endpoint).unwrap(), CollectorAuth::None));
    }

    #[test]
    fn basic_auth_without_username_is_invalid() {
        let endpoint = VesEndpoint::default();
        assert!(matches!(
            resolve_auth(&endpoint),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn tls_verification_mapping() {
        let mut cfg = Config::default();
        assert_eq!(cfg.collector_config().tls, TlsVerification::DangerAcceptInvalid);

        cfg.transport.insecure = Some(false);
        assert_eq!(cfg.collector_config().tls, TlsVerification::SystemDefaults);

        cfg.transport.ca_cert = Some(PathBuf::from("/etc/ssl/ves-ca.pem"));
        assert_eq!(
            cfg.collector_config().tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/ves-ca.pem"))
        );

        cfg.transport.insecure = Some(true);
        assert_eq!(cfg.collector_config().tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.ves.pnf_registration = Some(true);
        cfg.network_function.tls_connections = 2;
        save_config(&cfg, &path).unwrap();

        let loaded: Config = Figment::new().merge(Toml::file(&path)).extract().unwrap();
        assert_eq!(loaded.ves.pnf_registration, Some(true));
        assert_eq!(loaded.network_function.tls_connections, 2);
    }
}
