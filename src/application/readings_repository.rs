// Repository trait for reading data access
use crate::application::error::FetchError;
use crate::domain::reading::RawReading;
use async_trait::async_trait;

/// Trailing window of readings to request, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    days: u32,
}

impl FetchWindow {
    pub const DEFAULT_DAYS: u32 = 1;

    pub fn days(days: u32) -> Self {
        Self { days: days.max(1) }
    }

    pub fn as_days(&self) -> u32 {
        self.days
    }
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self::days(Self::DEFAULT_DAYS)
    }
}

#[async_trait]
pub trait ReadingsRepository: Send + Sync {
    /// Fetch raw readings for the trailing window, authorized with a bearer token
    async fn fetch_readings(
        &self,
        token: &str,
        window: FetchWindow,
    ) -> Result<Vec<RawReading>, FetchError>;
}
