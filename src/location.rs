//! Location Resolver collaborator.
//!
//! A lookup races a deadline; whichever finishes first decides the session's
//! pricing context. Every failure lands on the standard zone.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::pricing::{PricingContext, Zone};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates { pub latitude: f64, pub longitude: f64 }

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location lookup is not supported here")]
    Unsupported,

    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Reports a fixed position, e.g. one taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> { Ok(self.0) }
}

/// An environment with no positioning support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationResolver for NoLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> { Err(LocationError::Unsupported) }
}

/// Resolves the pricing context, falling back on error or after `deadline`.
pub async fn resolve_pricing(resolver: &dyn LocationResolver, deadline: Duration) -> PricingContext {
    match tokio::time::timeout(deadline, resolver.locate()).await {
        Ok(Ok(coords)) => {
            let zone = Zone::for_latitude(coords.latitude);
            tracing::info!(latitude = coords.latitude, zone = zone.name(), "Resolved pricing zone");
            PricingContext::for_zone(zone)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Location lookup failed, using standard zone");
            PricingContext::default()
        }
        Err(_) => {
            tracing::warn!(?deadline, "Location lookup timed out, using standard zone");
            PricingContext::default()
        }
    }
}
