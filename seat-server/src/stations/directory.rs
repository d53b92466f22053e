//! Station code to name lookup.
//!
//! Names come from an in-memory cache, then the `station_codes` table,
//! then the railway provider. Provider answers are written back to the
//! table so later lookups stay local.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use sqlx::SqlitePool;

use crate::domain::PnrStatus;
use crate::railway::RailwayProvider;
use crate::store::StationRepo;

use super::error::StationError;
use super::seed::seed_stations;

/// In-memory cache settings for the directory.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// TTL for cached names, including "unknown" answers.
    pub ttl: Duration,

    /// Maximum number of cached codes.
    pub max_capacity: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Outcome of [`StationDirectory::load_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub created: usize,
    pub existing: usize,
}

/// Station name lookup backed by the database and the railway provider.
#[derive(Clone)]
pub struct StationDirectory {
    pool: SqlitePool,
    provider: Arc<dyn RailwayProvider>,
    names: MokaCache<String, String>,
}

impl StationDirectory {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn RailwayProvider>,
        config: &DirectoryConfig,
    ) -> Self {
        let names = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            pool,
            provider,
            names,
        }
    }

    /// Insert the seed stations that are not present yet.
    pub async fn load_seed(&self) -> Result<SeedReport, StationError> {
        let mut report = SeedReport::default();

        for station in seed_stations() {
            let created = StationRepo::insert_if_missing(
                &self.pool,
                station.code,
                station.name,
                Some(station.state),
            )
            .await?;

            if created {
                tracing::debug!(code = station.code, name = station.name, "created station");
                report.created += 1;
            } else {
                report.existing += 1;
            }
        }

        Ok(report)
    }

    /// Name for a station code, or the code itself when nobody knows it.
    ///
    /// Lookup failures are logged and fall through to the next source.
    pub async fn name_for(&self, code: &str) -> String {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return code;
        }

        if let Some(name) = self.names.get(&code).await {
            return name;
        }

        match StationRepo::find(&self.pool, &code).await {
            Ok(Some(row)) => {
                self.names.insert(code, row.station_name.clone()).await;
                return row.station_name;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(code = %code, error = %e, "station table lookup failed"),
        }

        let name = self.provider.station_name(&code).await;
        if name != code {
            if let Err(e) = StationRepo::insert_if_missing(&self.pool, &code, &name, None).await {
                tracing::warn!(code = %code, error = %e, "failed to store station name");
            }
        }

        self.names.insert(code, name.clone()).await;
        name
    }

    /// Replace station names that are just codes with directory names.
    pub async fn enrich(&self, status: &mut PnrStatus) {
        if status.source_station == status.source_station_code {
            status.source_station = self.name_for(&status.source_station_code).await;
        }
        if status.destination_station == status.destination_station_code {
            status.destination_station = self.name_for(&status.destination_station_code).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::railway::{FixtureBook, FixtureRailwayClient};
    use crate::store::memory_pool;
    use chrono::NaiveDate;

    async fn directory(book: FixtureBook) -> (StationDirectory, SqlitePool) {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(FixtureRailwayClient::new(book));
        let dir = StationDirectory::new(pool.clone(), provider, &DirectoryConfig::default());
        (dir, pool)
    }

    #[tokio::test]
    async fn seed_is_get_or_create() {
        let (dir, pool) = directory(FixtureBook::sample()).await;

        let first = dir.load_seed().await.unwrap();
        assert_eq!(first, SeedReport { created: 20, existing: 0 });

        let second = dir.load_seed().await.unwrap();
        assert_eq!(second, SeedReport { created: 0, existing: 20 });
        assert_eq!(StationRepo::count(&pool).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn table_wins_over_provider() {
        let (dir, _pool) = directory(FixtureBook::sample()).await;
        dir.load_seed().await.unwrap();

        // Seed says "Bengaluru City", the fixture provider says "Bangalore City"
        assert_eq!(dir.name_for("sbc").await, "Bengaluru City");
    }

    #[tokio::test]
    async fn provider_answer_is_stored() {
        let mut book = FixtureBook::sample();
        book.stations.insert("RKMP".into(), "Rani Kamlapati".into());
        let (dir, pool) = directory(book).await;

        assert_eq!(dir.name_for("RKMP").await, "Rani Kamlapati");
        let row = StationRepo::find(&pool, "RKMP").await.unwrap().unwrap();
        assert_eq!(row.station_name, "Rani Kamlapati");
    }

    #[tokio::test]
    async fn unknown_code_is_returned_and_not_stored() {
        let (dir, pool) = directory(FixtureBook::sample()).await;

        assert_eq!(dir.name_for("XYZ").await, "XYZ");
        assert!(StationRepo::find(&pool, "XYZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn enrich_only_touches_code_names() {
        let (dir, _pool) = directory(FixtureBook::sample()).await;
        dir.load_seed().await.unwrap();

        let mut status = FixtureBook::sample()
            .fallback
            .to_status(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        status.source_station = "NDLS".into();
        status.source_station_code = "NDLS".into();
        status.destination_station = "Somewhere Else".into();
        status.destination_station_code = "HWH".into();

        dir.enrich(&mut status).await;
        assert_eq!(status.source_station, "New Delhi");
        assert_eq!(status.destination_station, "Somewhere Else");
    }
}
