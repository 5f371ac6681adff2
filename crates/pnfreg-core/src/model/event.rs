use serde::Serialize;

use super::fields::PnfRegistrationFields;
use super::header::CommonEventHeader;

pub const DOMAIN: &str = "pnfRegistration";
pub const EVENT_TYPE: &str = "EventType5G";
pub const PRIORITY: &str = "Normal";

/// `{"event": {...}}` envelope POSTed to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationEvent {
    pub event: EventBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    pub common_event_header: CommonEventHeader,
    pub pnf_registration_fields: PnfRegistrationFields,
}

impl RegistrationEvent {
    pub fn new(header: CommonEventHeader, fields: PnfRegistrationFields) -> Self {
        Self {
            event: EventBody {
                common_event_header: header,
                pnf_registration_fields: fields,
            },
        }
    }

    /// Compact JSON body for the POST.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
