// ── Advertised endpoint resolution ──
//
// Picks the address and base port a controller should use to reach the
// simulator's NETCONF endpoints.

use serde::Serialize;

use crate::config::{AddressingMethod, NetworkFunctionEnv};

/// IANA port for NETCONF over SSH; base port of a container's own endpoints.
pub const STANDARD_NETCONF_PORT: u16 = 830;

/// Address and first port to advertise in registration events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvertisedEndpoint {
    pub address: String,
    pub base_port: u16,
}

/// Resolve the advertised address and base port.
///
/// - `HostMapping`: host-visible IP and the host's mapped base port.
/// - `DockerMapping`: the container's IPv6 address when IPv6 is enabled,
///   otherwise its IPv4 address, on [`STANDARD_NETCONF_PORT`].
pub fn resolve_advertised_endpoint(
    env: &NetworkFunctionEnv,
    method: AddressingMethod,
) -> AdvertisedEndpoint {
    match method {
        AddressingMethod::HostMapping => AdvertisedEndpoint {
            address: env.host_ip.clone(),
            base_port: env.host_base_port,
        },
        AddressingMethod::DockerMapping => {
            let address = if env.ip_v6_enabled {
                env.ip_v6.clone()
            } else {
                env.ip_v4.clone()
            };
            AdvertisedEndpoint {
                address,
                base_port: STANDARD_NETCONF_PORT,
            }
        }
    }
}
