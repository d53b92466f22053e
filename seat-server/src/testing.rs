//! Fakes shared by unit tests.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::domain::{BerthAllocation, PassengerStatus, PnrNumber, PnrStatus, ScheduleEntry};
use crate::railway::RailwayProvider;
use crate::store::{NewUserRow, User, UserRepo};

/// Wraps a provider and counts PNR lookups.
pub struct CountingProvider {
    inner: Arc<dyn RailwayProvider>,
    calls: AtomicUsize,
}

impl CountingProvider {
    pub fn new(inner: Arc<dyn RailwayProvider>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RailwayProvider for CountingProvider {
    async fn pnr_status(&self, pnr: &PnrNumber) -> Option<PnrStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.pnr_status(pnr).await
    }

    async fn station_name(&self, code: &str) -> String {
        self.inner.station_name(code).await
    }

    async fn train_schedule(&self, train_number: &str) -> Vec<ScheduleEntry> {
        self.inner.train_schedule(train_number).await
    }
}

/// Answers every PNR with whatever was last set, counting calls.
pub struct ScriptedProvider {
    answer: Mutex<Option<PnrStatus>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(answer: Option<PnrStatus>) -> Self {
        Self {
            answer: Mutex::new(answer),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_answer(&self, answer: Option<PnrStatus>) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RailwayProvider for ScriptedProvider {
    async fn pnr_status(&self, _pnr: &PnrNumber) -> Option<PnrStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.lock().unwrap().clone()
    }

    async fn station_name(&self, code: &str) -> String {
        code.to_string()
    }

    async fn train_schedule(&self, _train_number: &str) -> Vec<ScheduleEntry> {
        Vec::new()
    }
}

pub fn pnr(s: &str) -> PnrNumber {
    PnrNumber::parse(s).unwrap()
}

/// A normalized status on the given route with `n` confirmed passengers.
pub fn status(source: &str, destination: &str, date: NaiveDate, n: u32) -> PnrStatus {
    let passengers = (1..=n)
        .map(|i| {
            let alloc = BerthAllocation::new("CNF", "B1", i.to_string(), "LB");
            PassengerStatus::new(i, alloc.clone(), alloc)
        })
        .collect();

    PnrStatus {
        train_number: "12951".into(),
        train_name: "MUMBAI RAJDHANI".into(),
        source_station: source.into(),
        destination_station: destination.into(),
        source_station_code: source.into(),
        destination_station_code: destination.into(),
        journey_date: date,
        journey_date_estimated: false,
        passenger_count: n,
        chart_prepared: false,
        travel_class: "3A".into(),
        passengers,
        booking_fare: Some("2500".into()),
        quota: Some("GN".into()),
        booking_date: None,
        arrival_date: None,
        distance: None,
        mobile_number: None,
        departure_time: None,
        arrival_time: None,
        duration: None,
    }
}

pub async fn user(pool: &SqlitePool, username: &str) -> User {
    let row = NewUserRow {
        username: username.into(),
        email: format!("{username}@example.com"),
        password_hash: "unused".into(),
        phone_number: "9876543210".into(),
        upi_id: None,
        is_staff: false,
        created_at: Utc::now(),
    };
    UserRepo::create(pool, &row).await.unwrap()
}
