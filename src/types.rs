use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;
use crate::error::Error;

/// Per-installation identifier sent as `client-vendor-id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a fresh random (UUID v4) device id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::validation("device id must not be empty"));
        }
        if !value.is_ascii() || value.chars().any(|c| c.is_ascii_control()) {
            return Err(Error::validation(format!(
                "device id `{value}` must be printable ASCII"
            )));
        }

        Ok(Self(value.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DeviceId::parse(s)
    }
}

/// Which device id a GraphQL call presents.
///
/// `AutoGenerate` mints a new id for that one call; it is never reused by a
/// later call, so a session that needs a stable identity must pass `Explicit`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceIdPolicy {
    Explicit(DeviceId),
    AutoGenerate,
}

impl DeviceIdPolicy {
    #[must_use]
    pub fn resolve(self) -> DeviceId {
        match self {
            DeviceIdPolicy::Explicit(id) => id,
            DeviceIdPolicy::AutoGenerate => {
                let id = DeviceId::generate();

                #[cfg(feature = "tracing")]
                tracing::debug!(device_id = %id, "generated one-off device id");

                id
            }
        }
    }
}

impl From<DeviceId> for DeviceIdPolicy {
    fn from(id: DeviceId) -> Self {
        DeviceIdPolicy::Explicit(id)
    }
}
