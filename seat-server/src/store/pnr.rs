//! Repository for `pnr_records` and their `passenger_details`.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use crate::domain::{PassengerStatus, PnrNumber, PnrStatus};

use super::models::{PassengerRow, PnrRecord};

const RECORD_COLUMNS: &str = "id, pnr_number, train_number, train_name, source_station, \
    destination_station, source_station_code, destination_station_code, journey_date, \
    journey_date_estimated, passenger_count, travel_class, chart_prepared, last_updated";

const PASSENGER_COLUMNS: &str = "id, pnr_record_id, serial_number, booking_status, \
    booking_coach, booking_berth, booking_berth_code, current_status, current_coach, \
    current_berth, current_berth_code";

pub struct PnrRepo;

impl PnrRepo {
    pub async fn find(
        e: impl SqliteExecutor<'_>,
        pnr: &PnrNumber,
    ) -> Result<Option<PnrRecord>, sqlx::Error> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM pnr_records WHERE pnr_number = ?");
        sqlx::query_as::<_, PnrRecord>(&query)
            .bind(pnr.as_str())
            .fetch_optional(e)
            .await
    }

    /// Passengers of a record, in serial order.
    pub async fn passengers(
        e: impl SqliteExecutor<'_>,
        record_id: i64,
    ) -> Result<Vec<PassengerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {PASSENGER_COLUMNS} FROM passenger_details
             WHERE pnr_record_id = ?
             ORDER BY serial_number, id"
        );
        sqlx::query_as::<_, PassengerRow>(&query)
            .bind(record_id)
            .fetch_all(e)
            .await
    }

    /// Insert or overwrite the header for `pnr`, returning its id.
    ///
    /// Every field is overwritten with the new value, empty or not.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        pnr: &PnrNumber,
        status: &PnrStatus,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO pnr_records
                (pnr_number, train_number, train_name, source_station, destination_station,
                 source_station_code, destination_station_code, journey_date,
                 journey_date_estimated, passenger_count, travel_class, chart_prepared, last_updated)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (pnr_number) DO UPDATE SET
                train_number = excluded.train_number,
                train_name = excluded.train_name,
                source_station = excluded.source_station,
                destination_station = excluded.destination_station,
                source_station_code = excluded.source_station_code,
                destination_station_code = excluded.destination_station_code,
                journey_date = excluded.journey_date,
                journey_date_estimated = excluded.journey_date_estimated,
                passenger_count = excluded.passenger_count,
                travel_class = excluded.travel_class,
                chart_prepared = excluded.chart_prepared,
                last_updated = excluded.last_updated
             RETURNING id",
        )
        .bind(pnr.as_str())
        .bind(&status.train_number)
        .bind(&status.train_name)
        .bind(&status.source_station)
        .bind(&status.destination_station)
        .bind(&status.source_station_code)
        .bind(&status.destination_station_code)
        .bind(status.journey_date)
        .bind(status.journey_date_estimated)
        .bind(i64::from(status.passenger_count))
        .bind(&status.travel_class)
        .bind(status.chart_prepared)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(id)
    }

    /// Replace the passenger set of a record.
    pub async fn replace_passengers(
        conn: &mut SqliteConnection,
        record_id: i64,
        passengers: &[PassengerStatus],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM passenger_details WHERE pnr_record_id = ?")
            .bind(record_id)
            .execute(&mut *conn)
            .await?;

        for p in passengers {
            sqlx::query(
                "INSERT INTO passenger_details
                    (pnr_record_id, serial_number, booking_status, booking_coach, booking_berth,
                     booking_berth_code, current_status, current_coach, current_berth,
                     current_berth_code)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(record_id)
            .bind(i64::from(p.serial_number))
            .bind(&p.booking.status)
            .bind(&p.booking.coach)
            .bind(&p.booking.berth)
            .bind(&p.booking.berth_code)
            .bind(&p.current.status)
            .bind(&p.current.coach)
            .bind(&p.current.berth)
            .bind(&p.current.berth_code)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Write a fresh provider answer: header and passengers in one transaction.
    pub async fn store(
        pool: &SqlitePool,
        pnr: &PnrNumber,
        status: &PnrStatus,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = Self::upsert(&mut tx, pnr, status, now).await?;
        Self::replace_passengers(&mut tx, id, &status.passengers).await?;
        tx.commit().await?;
        Ok(id)
    }

    /// Drop a cached record and, by cascade, its passengers.
    ///
    /// Not used by request handling; kept for operators who need to force
    /// the next lookup of a PNR to go to the provider.
    pub async fn delete(e: impl SqliteExecutor<'_>, pnr: &PnrNumber) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pnr_records WHERE pnr_number = ?")
            .bind(pnr.as_str())
            .execute(e)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BerthAllocation;
    use crate::store::memory_pool;
    use chrono::NaiveDate;

    fn pnr() -> PnrNumber {
        PnrNumber::parse("8634824688").unwrap()
    }

    fn passenger(serial: u32, berth: &str) -> PassengerStatus {
        let alloc = BerthAllocation::new("CNF", "B2", berth, "LB");
        PassengerStatus::new(serial, alloc.clone(), alloc)
    }

    fn status(passengers: Vec<PassengerStatus>) -> PnrStatus {
        PnrStatus {
            train_number: "12185".into(),
            train_name: "REWANCHAL EXP".into(),
            source_station: "RKMP".into(),
            destination_station: "REWA".into(),
            source_station_code: "RKMP".into(),
            destination_station_code: "REWA".into(),
            journey_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            journey_date_estimated: false,
            passenger_count: passengers.len() as u32,
            chart_prepared: false,
            travel_class: "3A".into(),
            passengers,
            booking_fare: Some("3740".into()),
            quota: None,
            booking_date: None,
            arrival_date: None,
            distance: None,
            mobile_number: None,
            departure_time: None,
            arrival_time: None,
            duration: None,
        }
    }

    #[tokio::test]
    async fn store_then_read_back() {
        let pool = memory_pool().await.unwrap();
        let s = status(vec![passenger(1, "41"), passenger(2, "42")]);
        let id = PnrRepo::store(&pool, &pnr(), &s, Utc::now()).await.unwrap();

        let record = PnrRepo::find(&pool, &pnr()).await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.train_name, "REWANCHAL EXP");
        assert_eq!(record.journey_date, s.journey_date);

        let rows = PnrRepo::passengers(&pool, id).await.unwrap();
        let back = record.to_status(&rows);
        assert_eq!(back.passengers, s.passengers);
        assert_eq!(back.passenger_count, 2);
        assert_eq!(back.booking_fare, None);
    }

    #[tokio::test]
    async fn second_store_overwrites_and_replaces_passengers() {
        let pool = memory_pool().await.unwrap();
        let first = status(vec![passenger(1, "41"), passenger(2, "42"), passenger(3, "43")]);
        let id = PnrRepo::store(&pool, &pnr(), &first, Utc::now()).await.unwrap();

        let mut second = status(vec![passenger(1, "7")]);
        second.train_name = String::new();
        let id2 = PnrRepo::store(&pool, &pnr(), &second, Utc::now()).await.unwrap();
        assert_eq!(id, id2);

        let record = PnrRepo::find(&pool, &pnr()).await.unwrap().unwrap();
        assert_eq!(record.train_name, "");

        let rows = PnrRepo::passengers(&pool, id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current_berth, "7");
    }

    #[tokio::test]
    async fn delete_cascades() {
        let pool = memory_pool().await.unwrap();
        let id = PnrRepo::store(&pool, &pnr(), &status(vec![passenger(1, "41")]), Utc::now())
            .await
            .unwrap();

        assert!(PnrRepo::delete(&pool, &pnr()).await.unwrap());
        assert!(PnrRepo::find(&pool, &pnr()).await.unwrap().is_none());
        assert!(PnrRepo::passengers(&pool, id).await.unwrap().is_empty());
    }
}
