//! Device position source.
//!
//! A terminal has no GPS, so the default provider answers from configuration:
//! a fixed position when one is configured, a denial when location access is
//! turned off.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Coordinates;
use crate::config::LocationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission was denied")]
    PermissionDenied,

    #[error("No position fix available")]
    Unavailable,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for permission to read the device position.
    async fn request_permission(&self) -> Permission;

    /// Read the current position once.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Provider answering with a configured position.
#[derive(Debug, Clone)]
pub struct StaticLocation {
    enabled: bool,
    position: Option<Coordinates>,
}

impl StaticLocation {
    pub const fn new(enabled: bool, position: Option<Coordinates>) -> Self {
        Self { enabled, position }
    }

    pub const fn denied() -> Self {
        Self::new(false, None)
    }
}

impl From<&LocationConfig> for StaticLocation {
    fn from(config: &LocationConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        if !config.enabled {
            return Self::denied();
        }
        Self::new(true, position)
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        if !self.enabled {
            return Err(LocationError::PermissionDenied);
        }
        self.position.ok_or(LocationError::Unavailable)
    }
}
