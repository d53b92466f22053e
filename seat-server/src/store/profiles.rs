//! Repository for `journey_profiles`.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::{PnrNumber, PnrStatus};

use super::models::JourneyProfile;

const PROFILE_COLUMNS: &str = "user_id, pnr_number, source_station, destination_station, \
    source_station_code, destination_station_code, journey_date, travel_class, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Record `status` as the user's current journey, replacing any earlier one.
    pub async fn upsert(
        e: impl SqliteExecutor<'_>,
        user_id: i64,
        pnr: &PnrNumber,
        status: &PnrStatus,
        now: DateTime<Utc>,
    ) -> Result<JourneyProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO journey_profiles
                (user_id, pnr_number, source_station, destination_station, source_station_code,
                 destination_station_code, journey_date, travel_class, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE SET
                pnr_number = excluded.pnr_number,
                source_station = excluded.source_station,
                destination_station = excluded.destination_station,
                source_station_code = excluded.source_station_code,
                destination_station_code = excluded.destination_station_code,
                journey_date = excluded.journey_date,
                travel_class = excluded.travel_class,
                updated_at = excluded.updated_at
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, JourneyProfile>(&query)
            .bind(user_id)
            .bind(pnr.as_str())
            .bind(&status.source_station)
            .bind(&status.destination_station)
            .bind(&status.source_station_code)
            .bind(&status.destination_station_code)
            .bind(status.journey_date)
            .bind(&status.travel_class)
            .bind(now)
            .fetch_one(e)
            .await
    }

    pub async fn find(
        e: impl SqliteExecutor<'_>,
        user_id: i64,
    ) -> Result<Option<JourneyProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM journey_profiles WHERE user_id = ?");
        sqlx::query_as::<_, JourneyProfile>(&query)
            .bind(user_id)
            .fetch_optional(e)
            .await
    }
}
