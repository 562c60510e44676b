use std::future::Future;
use std::time::Duration;

use crate::error::LocationError;
use crate::types::coords::Coords;

/// Platform geolocation. Each call is one position request.
pub trait LocationProvider {
    fn current_position(&self) -> impl Future<Output = Result<Coords, LocationError>>;
}

/// Provider that always answers with the configured position, or fails when
/// none was configured.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Coords>);

impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coords, LocationError> {
        self.0
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}

pub struct LocationService<L> {
    provider: L,
    timeout: Duration,
}

impl<L: LocationProvider> LocationService<L> {
    pub fn new(provider: L, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Issues a single request. Denial, timeout and a missing provider all
    /// collapse into `LocationError::Unavailable`; there is no retry.
    pub async fn request_position(&self) -> Result<Coords, LocationError> {
        match tokio::time::timeout(self.timeout, self.provider.current_position()).await {
            Ok(Ok(coords)) => {
                tracing::info!("Position acquired at {}", coords);
                Ok(coords)
            }
            Ok(Err(err)) => {
                tracing::warn!("Position request failed: {}", err);
                Err(err)
            }
            Err(_) => {
                tracing::warn!("Position request timed out after {:?}", self.timeout);
                Err(LocationError::Unavailable(format!(
                    "timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}
