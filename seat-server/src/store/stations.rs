//! Repository for `station_codes`.

use sqlx::SqliteExecutor;

use super::models::StationCode;

const STATION_COLUMNS: &str = "id, station_code, station_name, state";

pub struct StationRepo;

impl StationRepo {
    pub async fn find(
        e: impl SqliteExecutor<'_>,
        code: &str,
    ) -> Result<Option<StationCode>, sqlx::Error> {
        let query = format!("SELECT {STATION_COLUMNS} FROM station_codes WHERE station_code = ?");
        sqlx::query_as::<_, StationCode>(&query)
            .bind(code)
            .fetch_optional(e)
            .await
    }

    /// Insert unless the code already exists. Returns whether a row was added.
    pub async fn insert_if_missing(
        e: impl SqliteExecutor<'_>,
        code: &str,
        name: &str,
        state: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO station_codes (station_code, station_name, state)
             VALUES (?, ?, ?)
             ON CONFLICT (station_code) DO NOTHING",
        )
        .bind(code)
        .bind(name)
        .bind(state)
        .execute(e)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(e: impl SqliteExecutor<'_>) -> Result<i64, sqlx::Error> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM station_codes")
            .fetch_one(e)
            .await?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory_pool;

    #[tokio::test]
    async fn insert_is_get_or_create() {
        let pool = memory_pool().await.unwrap();

        assert!(StationRepo::insert_if_missing(&pool, "NDLS", "New Delhi", Some("Delhi")).await.unwrap());
        assert!(!StationRepo::insert_if_missing(&pool, "NDLS", "Elsewhere", None).await.unwrap());

        let row = StationRepo::find(&pool, "NDLS").await.unwrap().unwrap();
        assert_eq!(row.station_name, "New Delhi");
        assert_eq!(row.state.as_deref(), Some("Delhi"));
        assert_eq!(StationRepo::count(&pool).await.unwrap(), 1);
        assert!(StationRepo::find(&pool, "XYZ").await.unwrap().is_none());
    }
}
