// ── VES commonEventHeader ──
//
// Shared envelope header of every VES event the simulator emits. Only the
// five inputs vary per event; the remaining attributes are fixed values of
// the simulated vendor.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// `commonEventHeader` of a VES 7.x event.
///
/// Field order matches the serialized payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEventHeader {
    pub domain: String,
    pub event_id: String,
    pub event_name: String,
    pub event_type: String,
    pub sequence: u64,
    pub priority: String,
    pub reporting_entity_id: String,
    pub reporting_entity_name: String,
    pub source_id: String,
    pub source_name: String,
    pub start_epoch_microsec: i64,
    pub last_epoch_microsec: i64,
    pub nf_naming_code: String,
    pub nf_vendor_name: String,
    pub time_zone_offset: String,
    pub version: String,
    pub ves_event_listener_version: String,
}

impl CommonEventHeader {
    pub const VERSION: &'static str = "4.1";
    pub const VES_EVENT_LISTENER_VERSION: &'static str = "7.2.1";
    pub const NF_NAMING_CODE: &'static str = "sdn controller";
    pub const NF_VENDOR_NAME: &'static str = "sdn";
    pub const TIME_ZONE_OFFSET: &'static str = "+00:00";

    /// Build a header stamped with the current time.
    pub fn new(
        domain: &str,
        event_type: &str,
        source_name: &str,
        priority: &str,
        sequence: u64,
    ) -> Self {
        Self::at(domain, event_type, source_name, priority, sequence, Utc::now())
    }

    /// Build a header stamped with `now`.
    pub fn at(
        domain: &str,
        event_type: &str,
        source_name: &str,
        priority: &str,
        sequence: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let micros = now.timestamp_micros();
        Self {
            domain: domain.to_owned(),
            event_id: format!("{event_type}-{sequence}"),
            event_name: format!("{domain}_{event_type}"),
            event_type: event_type.to_owned(),
            sequence,
            priority: priority.to_owned(),
            reporting_entity_id: String::new(),
            reporting_entity_name: source_name.to_owned(),
            source_id: String::new(),
            source_name: source_name.to_owned(),
            start_epoch_microsec: micros,
            last_epoch_microsec: micros,
            nf_naming_code: Self::NF_NAMING_CODE.to_owned(),
            nf_vendor_name: Self::NF_VENDOR_NAME.to_owned(),
            time_zone_offset: Self::TIME_ZONE_OFFSET.to_owned(),
            version: Self::VERSION.to_owned(),
            ves_event_listener_version: Self::VES_EVENT_LISTENER_VERSION.to_owned(),
        }
    }
}
