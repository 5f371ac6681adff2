//! PNF registration for simulated network functions.
//!
//! At startup a simulated device announces each of its NETCONF management
//! endpoints to a VES collector with one `pnfRegistration` event per
//! endpoint. This crate owns that flow:
//!
//! - **[`address`]**: Resolves the address and base port to advertise,
//!   depending on the mount-point addressing method.
//! - **[`model`]**: The wire payload: [`CommonEventHeader`],
//!   [`PnfRegistrationFields`] and the [`RegistrationEvent`] envelope.
//! - **[`Registrar`]**: Gate on the enable flag, plan the endpoints
//!   (SSH first, then TLS, one shared port offset), build and POST each
//!   event, and collect per-endpoint outcomes into a [`RegistrationReport`].
//! - **[`SettingsSource`] / [`EventPublisher`] / [`MacSource`]**: The seams
//!   to configuration, the collector, and randomness.

pub mod address;
pub mod config;
pub mod error;
pub mod model;
pub mod publisher;
pub mod registration;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use address::{AdvertisedEndpoint, STANDARD_NETCONF_PORT, resolve_advertised_endpoint};
pub use config::{
    AddressingMethod, CollectorConfig, NetworkFunctionEnv, TlsVerification, VesEndpointDetails,
};
pub use error::CoreError;
pub use publisher::{EventPublisher, LazyCollector};
pub use registration::{
    Endpoint, EndpointOutcome, RegistrationReport, RegistrationSession, RegistrationStatus,
    Registrar, plan_endpoints,
};
pub use settings::{PNF_REGISTRATION_SETTING, SettingsSource};

pub use model::{
    AdditionalFields, CommonEventHeader, MacAddress, MacSource, PnfRegistrationFields, Protocol,
    RandomMac, RegistrationEvent,
};
