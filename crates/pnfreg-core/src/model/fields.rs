// ── pnfRegistrationFields ──

use serde::Serialize;
use strum::{AsRefStr, Display};

use super::mac::MacAddress;

// Fixed inventory values of the simulated device. Nothing derives them;
// whether they should become configurable is still open.
pub const FIELDS_VERSION: &str = "2.0";
pub const LAST_SERVICE_DATE: &str = "2019-08-16";
pub const MANUFACTURE_DATE: &str = "2019-08-16";
pub const MODEL_NUMBER: &str = "Simulated Device Melacon";
pub const OAM_V6_IP_ADDRESS: &str = "0:0:0:0:0:ffff:a0a:011";
pub const SOFTWARE_VERSION: &str = "2.3.5";
pub const UNIT_FAMILY: &str = "Simulated Device";
pub const UNIT_TYPE: &str = "O-RAN-sim";
pub const VENDOR_NAME: &str = "Melacon";

/// NETCONF username advertised for every endpoint.
pub const NETCONF_USERNAME: &str = "netconf";
/// NETCONF password advertised for SSH endpoints.
pub const NETCONF_PASSWORD: &str = "netconf";
/// Keystore entry the controller should use for TLS endpoints.
pub const TLS_KEY_ID: &str = "melacon_server_key";

/// Transport of a NETCONF management endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Protocol {
    Ssh,
    Tls,
}

/// `additionalFields`: how the controller should mount the endpoint.
///
/// Exactly one of `key_id` (TLS) and `password` (SSH) is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFields {
    pub oam_port: String,
    pub protocol: Protocol,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub reconnect_on_changed_schema: String,
    #[serde(rename = "sleep-factor")]
    pub sleep_factor: String,
    pub tcp_only: String,
    pub connection_timeout: String,
    pub max_connection_attempts: String,
    pub between_attempts_timeout: String,
    pub keepalive_delay: String,
}

impl AdditionalFields {
    pub fn new(port: u16, protocol: Protocol) -> Self {
        let (key_id, password) = match protocol {
            Protocol::Tls => (Some(TLS_KEY_ID.to_owned()), None),
            Protocol::Ssh => (None, Some(NETCONF_PASSWORD.to_owned())),
        };

        Self {
            oam_port: port.to_string(),
            protocol,
            username: NETCONF_USERNAME.to_owned(),
            key_id,
            password,
            reconnect_on_changed_schema: "false".into(),
            sleep_factor: "1.5".into(),
            tcp_only: "false".into(),
            connection_timeout: "20000".into(),
            max_connection_attempts: "100".into(),
            between_attempts_timeout: "2000".into(),
            keepalive_delay: "120".into(),
        }
    }
}

/// `pnfRegistrationFields` of one registration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnfRegistrationFields {
    pub pnf_registration_fields_version: String,
    pub last_service_date: String,
    pub mac_address: MacAddress,
    pub manufacture_date: String,
    pub model_number: String,
    pub oam_v4_ip_address: String,
    pub oam_v6_ip_address: String,
    pub serial_number: String,
    pub software_version: String,
    pub unit_family: String,
    pub unit_type: String,
    pub vendor_name: String,
    pub additional_fields: AdditionalFields,
}

impl PnfRegistrationFields {
    /// Assemble the fields for one endpoint.
    ///
    /// `oamV4IpAddress` carries the advertised address even when it is an
    /// IPv6 literal; `oamV6IpAddress` is a fixed placeholder.
    pub fn new(
        hostname: &str,
        address: &str,
        port: u16,
        protocol: Protocol,
        mac_address: MacAddress,
    ) -> Self {
        Self {
            pnf_registration_fields_version: FIELDS_VERSION.into(),
            last_service_date: LAST_SERVICE_DATE.into(),
            mac_address,
            manufacture_date: MANUFACTURE_DATE.into(),
            model_number: MODEL_NUMBER.into(),
            oam_v4_ip_address: address.to_owned(),
            oam_v6_ip_address: OAM_V6_IP_ADDRESS.into(),
            serial_number: serial_number(hostname, address, port),
            software_version: SOFTWARE_VERSION.into(),
            unit_family: UNIT_FAMILY.into(),
            unit_type: UNIT_TYPE.into(),
            vendor_name: VENDOR_NAME.into(),
            additional_fields: AdditionalFields::new(port, protocol),
        }
    }
}

/// `{hostname}-{address}-{port}-Simulated Device Melacon`
pub fn serial_number(hostname: &str, address: &str, port: u16) -> String {
    format!("{hostname}-{address}-{port}-{MODEL_NUMBER}")
}
