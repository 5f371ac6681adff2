// ── Settings seam ──
//
// The registrar reads its gate flag, the addressing method, and the
// collector details through this trait. pnfreg-config implements it over
// figment; tests implement it over plain structs.

use crate::config::{AddressingMethod, VesEndpointDetails};
use crate::error::CoreError;

/// Key of the boolean that enables PNF registration at startup.
pub const PNF_REGISTRATION_SETTING: &str = "ves.pnf_registration";

/// Read access to the simulator's configuration.
pub trait SettingsSource {
    /// Read a boolean setting.
    ///
    /// `Ok(None)` means the key is absent. Any other failure (wrong type,
    /// unreadable source) is an error.
    fn get_bool(&self, path: &str) -> Result<Option<bool>, CoreError>;

    /// Mount-point addressing method; falls back to the default when unset.
    fn addressing_method(&self) -> AddressingMethod;

    /// Collector URL and credentials.
    fn ves_endpoint_details(&self) -> Result<VesEndpointDetails, CoreError>;
}
