//! Repository for `listings`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqliteExecutor;

use crate::domain::{ListingStatus, SeatType};

use super::models::Listing;

const LISTING_COLUMNS: &str = "id, owner_id, pnr_number, train_number, train_name, \
    source_station, destination_station, source_station_code, destination_station_code, \
    journey_date, seat_type, seat_number, coach_number, price_paise, description, status, \
    created_at, updated_at";

/// Fields for a new listing. Journey fields come from the verified PNR.
#[derive(Debug, Clone)]
pub struct NewListingRow {
    pub owner_id: i64,
    pub pnr_number: String,
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    pub journey_date: NaiveDate,
    pub seat_type: SeatType,
    pub seat_number: String,
    pub coach_number: String,
    pub price_paise: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct ListingRepo;

impl ListingRepo {
    /// Insert an `AVAILABLE` listing.
    pub async fn create(
        e: impl SqliteExecutor<'_>,
        input: &NewListingRow,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings
                (owner_id, pnr_number, train_number, train_name, source_station,
                 destination_station, source_station_code, destination_station_code, journey_date,
                 seat_type, seat_number, coach_number, price_paise, description, status,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {LISTING_COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.owner_id)
            .bind(&input.pnr_number)
            .bind(&input.train_number)
            .bind(&input.train_name)
            .bind(&input.source_station)
            .bind(&input.destination_station)
            .bind(&input.source_station_code)
            .bind(&input.destination_station_code)
            .bind(input.journey_date)
            .bind(input.seat_type)
            .bind(&input.seat_number)
            .bind(&input.coach_number)
            .bind(input.price_paise)
            .bind(&input.description)
            .bind(ListingStatus::Available)
            .bind(input.created_at)
            .bind(input.created_at)
            .fetch_one(e)
            .await
    }

    pub async fn find(e: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(e)
            .await
    }

    /// Available listings not owned by `requester`, newest first.
    pub async fn list_available_excluding(
        e: impl SqliteExecutor<'_>,
        requester: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM listings
             WHERE status = ? AND owner_id != ?
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(ListingStatus::Available)
            .bind(requester)
            .fetch_all(e)
            .await
    }

    /// Every listing of one owner, newest first.
    pub async fn list_by_owner(
        e: impl SqliteExecutor<'_>,
        owner_id: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS} FROM listings
             WHERE owner_id = ?
             ORDER BY id DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(e)
            .await
    }

    /// Move a listing from `from` to `to`. Returns `false` if it was not in `from`.
    pub async fn transition(
        e: impl SqliteExecutor<'_>,
        id: i64,
        from: ListingStatus,
        to: ListingStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE listings SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
                .bind(to)
                .bind(now)
                .bind(id)
                .bind(from)
                .execute(e)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
