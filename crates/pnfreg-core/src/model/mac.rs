use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from colon- or dash-separated input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase().replace('-', ":"))
    }

    pub fn from_octets(octets: [u8; 6]) -> Self {
        let [a, b, c, d, e, f] = octets;
        Self(format!("{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{f:02x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── MacSource ───────────────────────────────────────────────────────

/// Source of the per-event MAC address.
pub trait MacSource {
    fn random_mac(&self) -> Result<MacAddress, CoreError>;
}

/// Draws six bytes from the thread-local RNG for every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMac;

impl MacSource for RandomMac {
    fn random_mac(&self) -> Result<MacAddress, CoreError> {
        let mut octets = [0u8; 6];
        rand::thread_rng()
            .try_fill_bytes(&mut octets)
            .map_err(|e| CoreError::PayloadBuild {
                message: format!("random MAC generation failed: {e}"),
            })?;
        Ok(MacAddress::from_octets(octets))
    }
}
