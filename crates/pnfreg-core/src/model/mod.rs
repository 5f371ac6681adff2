// ── pnfRegistration wire model ──
//
// Field names and string encodings follow the VES 7.x pnfRegistration
// schema. Numeric and boolean tuning values in `additionalFields` are
// strings on the wire and stay strings here.

pub mod event;
pub mod fields;
pub mod header;
pub mod mac;

pub use event::{EventBody, RegistrationEvent};
pub use fields::{AdditionalFields, PnfRegistrationFields, Protocol};
pub use header::CommonEventHeader;
pub use mac::{MacAddress, MacSource, RandomMac};
