//! SQLite persistence.
//!
//! One pool, one embedded migration, and a repository struct per table.
//! Repositories are stateless: every method takes the executor it should
//! run on, so the same call works against the pool or inside a
//! transaction.

mod exchanges;
mod listings;
mod models;
mod pnr;
mod profiles;
mod stations;
mod users;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use exchanges::ExchangeRepo;
pub use listings::{ListingRepo, NewListingRow};
pub use models::{
    Exchange, ExchangeDetail, JourneyProfile, Listing, PassengerRow, PnrRecord, StationCode, User,
};
pub use pnr::PnrRepo;
pub use profiles::ProfileRepo;
pub use stations::StationRepo;
pub use users::{NewUserRow, UserRepo, is_unique_violation};

/// Create a connection pool from a database URL such as
/// `sqlite://seatswap.db?mode=rwc`.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// A private in-memory database with migrations applied.
///
/// Uses a single connection that never expires, since every SQLite
/// in-memory connection is its own database.
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Cheap round trip to check the database is reachable.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
