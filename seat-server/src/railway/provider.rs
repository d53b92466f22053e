//! The railway status capability set and provider selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{PnrNumber, PnrStatus, ScheduleEntry};

use super::client::{RailwayConfig, RapidApiClient};
use super::error::RailwayError;
use super::fixture::{FixtureBook, FixtureRailwayClient};

/// Source of railway status data.
///
/// Every method fails soft: transport errors, non-200 answers and rate
/// limiting produce the fallback value (`None`, the code itself, an empty
/// list) and are logged, never returned.
#[async_trait]
pub trait RailwayProvider: Send + Sync {
    /// Normalized status of a PNR, or `None` if it could not be obtained.
    async fn pnr_status(&self, pnr: &PnrNumber) -> Option<PnrStatus>;

    /// Name of a station, or `code` itself when unknown.
    async fn station_name(&self, code: &str) -> String;

    /// Timetable of a train, or empty when unavailable.
    async fn train_schedule(&self, train_number: &str) -> Vec<ScheduleEntry>;
}

#[async_trait]
impl RailwayProvider for RapidApiClient {
    async fn pnr_status(&self, pnr: &PnrNumber) -> Option<PnrStatus> {
        match self.get_pnr_status(pnr).await {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(pnr = %pnr, error = %e, "PNR status lookup failed");
                None
            }
        }
    }

    async fn station_name(&self, code: &str) -> String {
        match self.get_station_name(code).await {
            Ok(Some(name)) => name,
            Ok(None) => code.to_string(),
            Err(e) => {
                tracing::warn!(code, error = %e, "station name lookup failed");
                code.to_string()
            }
        }
    }

    async fn train_schedule(&self, train_number: &str) -> Vec<ScheduleEntry> {
        match self.get_train_schedule(train_number).await {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::warn!(train_number, error = %e, "train schedule lookup failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RailwayProvider for FixtureRailwayClient {
    async fn pnr_status(&self, pnr: &PnrNumber) -> Option<PnrStatus> {
        Some(self.get_pnr_status(pnr))
    }

    async fn station_name(&self, code: &str) -> String {
        self.get_station_name(code)
    }

    async fn train_schedule(&self, train_number: &str) -> Vec<ScheduleEntry> {
        self.get_train_schedule(train_number)
    }
}

/// Which provider implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Canned data from [`FixtureBook::sample`].
    #[default]
    Fixture,
    /// The RapidAPI IRCTC service.
    Live,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixture" | "mock" => Ok(ProviderKind::Fixture),
            "live" | "rapidapi" => Ok(ProviderKind::Live),
            other => Err(format!("unknown railway provider: {other}")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Fixture => f.write_str("fixture"),
            ProviderKind::Live => f.write_str("live"),
        }
    }
}

/// Provider selection plus the live client's settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub railway: RailwayConfig,
}

/// Build the configured provider.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn RailwayProvider>, RailwayError> {
    match config.kind {
        ProviderKind::Fixture => Ok(Arc::new(FixtureRailwayClient::new(FixtureBook::sample()))),
        ProviderKind::Live => Ok(Arc::new(RapidApiClient::new(config.railway.clone())?)),
    }
}
