//! Repository for `exchanges`.

use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::domain::PaymentStatus;

use super::models::{Exchange, ExchangeDetail};

const EXCHANGE_COLUMNS: &str = "id, listing_id, buyer_id, seller_id, exchange_amount_paise, \
    payment_status, payment_transaction_id, buyer_pnr, exchange_date, completion_date";

const DETAIL_SELECT: &str = "SELECT
        x.id, x.listing_id, x.buyer_id, x.seller_id,
        b.username AS buyer_username,
        s.username AS seller_username,
        l.train_number, l.train_name, l.journey_date, l.coach_number, l.seat_number,
        x.exchange_amount_paise, x.payment_status, x.payment_transaction_id, x.buyer_pnr,
        x.exchange_date, x.completion_date
     FROM exchanges x
     JOIN listings l ON l.id = x.listing_id
     JOIN users b ON b.id = x.buyer_id
     JOIN users s ON s.id = x.seller_id";

pub struct ExchangeRepo;

impl ExchangeRepo {
    /// Insert a `PENDING` exchange.
    pub async fn create(
        e: impl SqliteExecutor<'_>,
        listing_id: i64,
        buyer_id: i64,
        seller_id: i64,
        amount_paise: i64,
        buyer_pnr: &str,
        now: DateTime<Utc>,
    ) -> Result<Exchange, sqlx::Error> {
        let query = format!(
            "INSERT INTO exchanges
                (listing_id, buyer_id, seller_id, exchange_amount_paise, payment_status,
                 buyer_pnr, exchange_date)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {EXCHANGE_COLUMNS}"
        );
        sqlx::query_as::<_, Exchange>(&query)
            .bind(listing_id)
            .bind(buyer_id)
            .bind(seller_id)
            .bind(amount_paise)
            .bind(PaymentStatus::Pending)
            .bind(buyer_pnr)
            .bind(now)
            .fetch_one(e)
            .await
    }

    pub async fn find(e: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Exchange>, sqlx::Error> {
        let query = format!("SELECT {EXCHANGE_COLUMNS} FROM exchanges WHERE id = ?");
        sqlx::query_as::<_, Exchange>(&query)
            .bind(id)
            .fetch_optional(e)
            .await
    }

    /// Record payment of a pending exchange. Returns `false` if it was not pending.
    pub async fn mark_paid(
        e: impl SqliteExecutor<'_>,
        id: i64,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE exchanges
             SET payment_status = ?, payment_transaction_id = ?, completion_date = ?
             WHERE id = ? AND payment_status = ?",
        )
        .bind(PaymentStatus::Paid)
        .bind(transaction_id)
        .bind(now)
        .bind(id)
        .bind(PaymentStatus::Pending)
        .execute(e)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Exchanges where the user is the buyer, newest first.
    pub async fn list_for_buyer(
        e: impl SqliteExecutor<'_>,
        buyer_id: i64,
    ) -> Result<Vec<ExchangeDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE x.buyer_id = ? ORDER BY x.id DESC");
        sqlx::query_as::<_, ExchangeDetail>(&query)
            .bind(buyer_id)
            .fetch_all(e)
            .await
    }

    /// Exchanges where the user is the seller, newest first.
    pub async fn list_for_seller(
        e: impl SqliteExecutor<'_>,
        seller_id: i64,
    ) -> Result<Vec<ExchangeDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE x.seller_id = ? ORDER BY x.id DESC");
        sqlx::query_as::<_, ExchangeDetail>(&query)
            .bind(seller_id)
            .fetch_all(e)
            .await
    }

    /// Every exchange in the given payment state, newest first.
    pub async fn list_by_status(
        e: impl SqliteExecutor<'_>,
        status: PaymentStatus,
    ) -> Result<Vec<ExchangeDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE x.payment_status = ? ORDER BY x.id DESC");
        sqlx::query_as::<_, ExchangeDetail>(&query)
            .bind(status)
            .fetch_all(e)
            .await
    }
}
