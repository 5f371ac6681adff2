// ── Runtime registration configuration ──
//
// These types describe the simulated network function and where its
// registration events go. They never touch disk: pnfreg-config loads the
// TOML/env layers and hands these in.

use pnfreg_api::{CollectorAuth, TlsMode, TransportConfig};
use strum::{AsRefStr, Display, EnumString};
use url::Url;

use crate::error::CoreError;

/// How the simulator's NETCONF endpoints are reachable from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum AddressingMethod {
    /// Direct container address (`ip_v4` / `ip_v6`) on the standard port.
    #[default]
    DockerMapping,
    /// Host-visible address and port range mapped onto the container.
    HostMapping,
}

/// Environment facts of the simulated network function.
#[derive(Debug, Clone, Default)]
pub struct NetworkFunctionEnv {
    pub hostname: String,
    /// Address of the docker host, used with [`AddressingMethod::HostMapping`].
    pub host_ip: String,
    /// First host port mapped to the container's NETCONF ports.
    pub host_base_port: u16,
    pub ip_v4: String,
    pub ip_v6: String,
    pub ip_v6_enabled: bool,
    /// Number of NETCONF-over-SSH endpoints exposed.
    pub ssh_connections: u16,
    /// Number of NETCONF-over-TLS endpoints exposed.
    pub tls_connections: u16,
}

/// Collector URL and credentials for one registration send.
#[derive(Debug, Clone)]
pub struct VesEndpointDetails {
    pub url: Url,
    pub auth: CollectorAuth,
}

impl VesEndpointDetails {
    /// Path of the VES 7.x event listener.
    pub const LISTENER_PATH: &'static str = "eventListener/v7";

    /// Build `{protocol}://{ip}:{port}/eventListener/v7`.
    ///
    /// IPv6 literals are bracketed.
    pub fn from_parts(
        protocol: &str,
        ip: &str,
        port: u16,
        auth: CollectorAuth,
    ) -> Result<Self, CoreError> {
        if protocol != "http" && protocol != "https" {
            return Err(CoreError::EndpointDetailsUnavailable {
                message: format!("unsupported protocol '{protocol}', expected http or https"),
            });
        }
        if ip.is_empty() {
            return Err(CoreError::EndpointDetailsUnavailable {
                message: "collector ip is empty".into(),
            });
        }

        let host = if ip.contains(':') && !ip.starts_with('[') {
            format!("[{ip}]")
        } else {
            ip.to_owned()
        };
        let raw = format!("{protocol}://{host}:{port}/{}", Self::LISTENER_PATH);
        let url = Url::parse(&raw).map_err(|e| CoreError::EndpointDetailsUnavailable {
            message: format!("invalid collector URL {raw}: {e}"),
        })?;

        Ok(Self { url, auth })
    }
}

/// TLS verification strategy for the collector connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed collectors). Default for lab setups.
    #[default]
    DangerAcceptInvalid,
}

/// How to talk to the collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub tls: TlsVerification,
    pub timeout: std::time::Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
        }
    }
}

impl CollectorConfig {
    /// Transport settings for the HTTP client used by every send of a run.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
