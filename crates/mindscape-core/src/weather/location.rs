//! Device position with a bounded wait and a fixed fallback.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::storage::WeatherConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Configured fallback coordinate.
    pub fn fallback(config: &WeatherConfig) -> Self {
        Self::new(config.fallback_latitude, config.fallback_longitude)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location services unavailable")]
    Unavailable,

    #[error("location fix failed: {0}")]
    Failed(String),
}

/// Source of a one-shot, permission-gated position fix.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// A position the user configured by hand.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No positioning available on this device.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

#[async_trait]
impl LocationProvider for DeniedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Denied)
    }
}

/// Where the coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedLocation {
    Device(Coordinates),
    Fallback(Coordinates),
}

impl ResolvedLocation {
    pub fn coordinates(self) -> Coordinates {
        match self {
            Self::Device(c) | Self::Fallback(c) => c,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Wait up to `wait` for a fix, falling back on denial, failure or timeout.
pub async fn resolve_location(
    provider: &dyn LocationProvider,
    wait: Duration,
    fallback: Coordinates,
) -> ResolvedLocation {
    match tokio::time::timeout(wait, provider.current_location()).await {
        Ok(Ok(coords)) => ResolvedLocation::Device(coords),
        Ok(Err(e)) => {
            tracing::info!(error = %e, "using fallback location");
            ResolvedLocation::Fallback(fallback)
        }
        Err(_) => {
            tracing::info!(wait_secs = wait.as_secs(), "location fix timed out, using fallback");
            ResolvedLocation::Fallback(fallback)
        }
    }
}
