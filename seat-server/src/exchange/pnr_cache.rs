//! Persisted PNR status cache.
//!
//! A PNR is fetched from the provider at most once per TTL. Fresh records
//! are rebuilt from `pnr_records` and `passenger_details`; stale or
//! missing ones are refetched and overwritten wholesale.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use sqlx::SqlitePool;

use crate::domain::{PnrNumber, PnrStatus};
use crate::railway::RailwayProvider;
use crate::store::PnrRepo;

/// Default hours a cached PNR stays fresh.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Read-through cache in front of a [`RailwayProvider`].
pub struct PnrCache {
    pool: SqlitePool,
    provider: Arc<dyn RailwayProvider>,
    ttl: TimeDelta,
}

impl PnrCache {
    pub fn new(pool: SqlitePool, provider: Arc<dyn RailwayProvider>) -> Self {
        Self {
            pool,
            provider,
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
        }
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Status of a PNR, from the cache when fresh.
    ///
    /// `None` means the provider had no answer or the database failed;
    /// both are logged.
    pub async fn fetch_pnr_status(&self, pnr: &PnrNumber) -> Option<PnrStatus> {
        self.fetch_at(pnr, Utc::now()).await
    }

    /// [`fetch_pnr_status`](Self::fetch_pnr_status) with an explicit clock.
    pub async fn fetch_at(&self, pnr: &PnrNumber, now: DateTime<Utc>) -> Option<PnrStatus> {
        match self.lookup(pnr, now).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(pnr = %pnr, error = %e, "PNR cache database error");
                None
            }
        }
    }

    async fn lookup(
        &self,
        pnr: &PnrNumber,
        now: DateTime<Utc>,
    ) -> Result<Option<PnrStatus>, sqlx::Error> {
        if let Some(record) = PnrRepo::find(&self.pool, pnr).await? {
            if now - record.last_updated < self.ttl {
                let passengers = PnrRepo::passengers(&self.pool, record.id).await?;
                tracing::debug!(pnr = %pnr, "PNR cache hit");
                return Ok(Some(record.to_status(&passengers)));
            }
            tracing::debug!(pnr = %pnr, last_updated = %record.last_updated, "PNR cache stale");
        }

        let Some(status) = self.provider.pnr_status(pnr).await else {
            tracing::info!(pnr = %pnr, "provider returned no status");
            return Ok(None);
        };

        PnrRepo::store(&self.pool, pnr, &status, now).await?;
        tracing::info!(
            pnr = %pnr,
            train = %status.train_number,
            passengers = status.passengers.len(),
            "PNR status refreshed"
        );

        Ok(Some(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::railway::{FixtureBook, FixtureRailwayClient};
    use crate::store::memory_pool;
    use crate::testing::{CountingProvider, ScriptedProvider, pnr, status};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[tokio::test]
    async fn fresh_record_skips_provider() {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(ScriptedProvider::new(Some(status("NDLS", "BCT", date(), 2))));
        let cache = PnrCache::new(pool, provider.clone());

        let now = Utc::now();
        let first = cache.fetch_at(&pnr("1111111111"), now).await.unwrap();
        let second = cache
            .fetch_at(&pnr("1111111111"), now + TimeDelta::hours(23))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(second.train_number, first.train_number);
        assert_eq!(second.passengers, first.passengers);
        assert_eq!(second.passengers[0].status_display, "CNF/B1/1/LB");
        // Not persisted, so gone on a cache hit
        assert_eq!(first.booking_fare.as_deref(), Some("2500"));
        assert_eq!(second.booking_fare, None);
    }

    #[tokio::test]
    async fn stale_record_is_refetched_and_replaced() {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(ScriptedProvider::new(Some(status("NDLS", "BCT", date(), 3))));
        let cache = PnrCache::new(pool, provider.clone());

        let t0 = Utc::now();
        let first = cache.fetch_at(&pnr("1111111111"), t0).await.unwrap();
        assert_eq!(first.travel_class, "3A");

        let mut changed = status("NDLS", "BCT", date(), 1);
        changed.train_name = String::new();
        changed.travel_class = String::new();
        changed.chart_prepared = !first.chart_prepared;
        changed.passengers[0].current = crate::domain::BerthAllocation::new("CNF", "A1", "5", "UB");
        provider.set_answer(Some(changed));

        let later = t0 + TimeDelta::hours(25);
        cache.fetch_at(&pnr("1111111111"), later).await.unwrap();
        assert_eq!(provider.calls(), 2);

        let cached = cache
            .fetch_at(&pnr("1111111111"), later + TimeDelta::minutes(1))
            .await
            .unwrap();
        assert_eq!(provider.calls(), 2);
        assert_eq!(cached.train_name, "");
        assert_eq!(cached.travel_class, "");
        assert_eq!(cached.chart_prepared, !first.chart_prepared);
        assert_eq!(cached.passenger_count, 1);
        assert_eq!(cached.passengers.len(), 1);
        assert_eq!(cached.passengers[0].status_display, "CNF/A1/5/UB");
    }

    #[tokio::test]
    async fn provider_miss_writes_nothing() {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(ScriptedProvider::new(None));
        let cache = PnrCache::new(pool.clone(), provider.clone());

        assert!(cache.fetch_pnr_status(&pnr("2222222222")).await.is_none());
        assert!(PnrRepo::find(&pool, &pnr("2222222222")).await.unwrap().is_none());

        // A miss is not cached
        cache.fetch_pnr_status(&pnr("2222222222")).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn custom_ttl() {
        let pool = memory_pool().await.unwrap();
        let provider = Arc::new(ScriptedProvider::new(Some(status("NDLS", "BCT", date(), 1))));
        let cache = PnrCache::new(pool, provider.clone()).with_ttl(TimeDelta::minutes(5));

        let t0 = Utc::now();
        cache.fetch_at(&pnr("1111111111"), t0).await;
        cache.fetch_at(&pnr("1111111111"), t0 + TimeDelta::minutes(6)).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn fixture_pnr_end_to_end() {
        let pool = memory_pool().await.unwrap();
        let fixture = Arc::new(FixtureRailwayClient::new(FixtureBook::sample()));
        let provider = Arc::new(CountingProvider::new(fixture));
        let cache = PnrCache::new(pool, provider.clone());

        let first = cache.fetch_pnr_status(&pnr("8634824688")).await.unwrap();
        let second = cache.fetch_pnr_status(&pnr("8634824688")).await.unwrap();

        assert_eq!(provider.calls(), 1);
        for s in [&first, &second] {
            assert_eq!(s.train_number, "12185");
            assert_eq!(s.train_name, "REWANCHAL EXP");
            assert_eq!(s.travel_class, "3A");
            assert_eq!(s.passenger_count, 4);
            assert_eq!(s.passengers.len(), 4);
        }
    }
}
