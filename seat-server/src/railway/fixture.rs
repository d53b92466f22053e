//! Fixture railway client for running without API access.
//!
//! Serves canned PNR records, station names and a schedule from a
//! [`FixtureBook`] handed over at construction. Unknown PNRs get the
//! book's fallback record, so any well-formed PNR "verifies".

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::domain::{BerthAllocation, PassengerStatus, PnrNumber, PnrStatus, ScheduleEntry};

/// A canned PNR record.
///
/// The journey date is left open so fixtures always describe a journey
/// happening "today" at lookup time.
#[derive(Debug, Clone)]
pub struct FixturePnr {
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    /// Fixed date, or `None` for the lookup day.
    pub journey_date: Option<NaiveDate>,
    pub passenger_count: u32,
    pub chart_prepared: bool,
    pub travel_class: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub booking_fare: String,
    pub quota: String,
    pub booking_date: String,
    pub passengers: Vec<PassengerStatus>,
}

impl FixturePnr {
    /// Materialize the fixture as a normalized status for the given day.
    pub fn to_status(&self, today: NaiveDate) -> PnrStatus {
        PnrStatus {
            train_number: self.train_number.clone(),
            train_name: self.train_name.clone(),
            source_station: self.source_station.clone(),
            destination_station: self.destination_station.clone(),
            source_station_code: self.source_station_code.clone(),
            destination_station_code: self.destination_station_code.clone(),
            journey_date: self.journey_date.unwrap_or(today),
            journey_date_estimated: false,
            passenger_count: self.passenger_count,
            chart_prepared: self.chart_prepared,
            travel_class: self.travel_class.clone(),
            passengers: self.passengers.clone(),
            booking_fare: Some(self.booking_fare.clone()),
            quota: Some(self.quota.clone()),
            booking_date: Some(self.booking_date.clone()),
            arrival_date: None,
            distance: None,
            mobile_number: None,
            departure_time: Some(self.departure_time.clone()),
            arrival_time: Some(self.arrival_time.clone()),
            duration: Some(self.duration.clone()),
        }
    }
}

/// Immutable fixture data for [`FixtureRailwayClient`].
#[derive(Debug, Clone)]
pub struct FixtureBook {
    /// Known PNRs, keyed by the 10-digit number.
    pub pnrs: HashMap<String, FixturePnr>,
    /// Returned for any PNR not in `pnrs`.
    pub fallback: FixturePnr,
    /// Station code → name.
    pub stations: HashMap<String, String>,
    /// Returned for every train number.
    pub schedule: Vec<ScheduleEntry>,
}

impl FixtureBook {
    /// The sample data set used in development.
    pub fn sample() -> Self {
        let pnrs = HashMap::from([
            (
                "8634824688".to_string(),
                FixturePnr {
                    train_number: "12185".into(),
                    train_name: "REWANCHAL EXP".into(),
                    source_station: "Rani Kamlapati(Bhopal)".into(),
                    destination_station: "Rewa".into(),
                    source_station_code: "RKMP".into(),
                    destination_station_code: "REWA".into(),
                    journey_date: None,
                    passenger_count: 4,
                    chart_prepared: false,
                    travel_class: "3A".into(),
                    departure_time: "22:00".into(),
                    arrival_time: "08:00".into(),
                    duration: "10:0".into(),
                    booking_fare: "3740".into(),
                    quota: "GN".into(),
                    booking_date: "28-06-2025".into(),
                    passengers: vec![
                        confirmed(1, "B2", "41", "LB"),
                        confirmed(2, "B2", "42", "MB"),
                        confirmed(3, "B2", "43", "UB"),
                        confirmed(4, "B2", "47", "SL"),
                    ],
                },
            ),
            (
                "4335734389".to_string(),
                FixturePnr {
                    train_number: "17221".into(),
                    train_name: "COA LTT EXPRESS".into(),
                    source_station: "Kakinada Town".into(),
                    destination_station: "Secunderabad Junction".into(),
                    source_station_code: "CCT".into(),
                    destination_station_code: "SC".into(),
                    journey_date: None,
                    passenger_count: 1,
                    chart_prepared: true,
                    travel_class: "SL".into(),
                    departure_time: "19:45".into(),
                    arrival_time: "06:45".into(),
                    duration: "11:0".into(),
                    booking_fare: "385".into(),
                    quota: "GN".into(),
                    booking_date: "25-06-2025".into(),
                    passengers: vec![confirmed(1, "S4", "71", "SU")],
                },
            ),
            (
                "1234567890".to_string(),
                FixturePnr {
                    train_number: "18447".into(),
                    train_name: "HIRAKUD EXP".into(),
                    source_station: "Jagdalpur".into(),
                    destination_station: "Puri".into(),
                    source_station_code: "JDB".into(),
                    destination_station_code: "PURI".into(),
                    journey_date: None,
                    passenger_count: 2,
                    chart_prepared: false,
                    travel_class: "3A".into(),
                    departure_time: "09:08".into(),
                    arrival_time: "20:20".into(),
                    duration: "11:12".into(),
                    booking_fare: "855".into(),
                    quota: "GN".into(),
                    booking_date: "27-08-2022".into(),
                    passengers: vec![
                        confirmed(1, "B1", "9", "LB"),
                        PassengerStatus::new(
                            2,
                            BerthAllocation::new("RAC", "B1", "15", "SL"),
                            BerthAllocation::new("RAC", "B1", "15", "SL"),
                        ),
                    ],
                },
            ),
        ]);

        let fallback = FixturePnr {
            train_number: "12345".into(),
            train_name: "TEST EXPRESS".into(),
            source_station: "Test Station A".into(),
            destination_station: "Test Station B".into(),
            source_station_code: "TSA".into(),
            destination_station_code: "TSB".into(),
            journey_date: None,
            passenger_count: 1,
            chart_prepared: false,
            travel_class: "SL".into(),
            departure_time: "10:00".into(),
            arrival_time: "18:00".into(),
            duration: "8:0".into(),
            booking_fare: "500".into(),
            quota: "GN".into(),
            booking_date: "01-01-2025".into(),
            passengers: vec![confirmed(1, "S1", "12", "MB")],
        };

        let stations = [
            ("NDLS", "New Delhi"),
            ("CSMT", "Chhatrapati Shivaji Maharaj Terminus"),
            ("HWH", "Howrah Junction"),
            ("MAS", "Chennai Central"),
            ("SBC", "Bangalore City"),
            ("PUNE", "Pune Junction"),
            ("JP", "Jaipur"),
            ("ADI", "Ahmedabad Junction"),
            ("BPL", "Bhopal Junction"),
            ("INDB", "Indore Junction"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        let schedule = vec![
            stop("Source Station", "SRC", "00:00", "10:00", 0),
            stop("Intermediate Station", "INT", "14:00", "14:05", 200),
            stop("Destination Station", "DST", "18:00", "18:00", 400),
        ];

        Self {
            pnrs,
            fallback,
            stations,
            schedule,
        }
    }
}

fn confirmed(serial: u32, coach: &str, berth: &str, code: &str) -> PassengerStatus {
    let alloc = BerthAllocation::new("CNF", coach, berth, code);
    PassengerStatus::new(serial, alloc.clone(), alloc)
}

fn stop(name: &str, code: &str, arrival: &str, departure: &str, distance: u32) -> ScheduleEntry {
    ScheduleEntry {
        station_name: name.to_string(),
        station_code: code.to_string(),
        arrival_time: arrival.to_string(),
        departure_time: departure.to_string(),
        distance,
        day: 1,
    }
}

/// Railway client that serves data from a [`FixtureBook`].
#[derive(Debug, Clone)]
pub struct FixtureRailwayClient {
    book: Arc<FixtureBook>,
}

impl FixtureRailwayClient {
    /// Create a client over the given fixture data.
    pub fn new(book: FixtureBook) -> Self {
        Self {
            book: Arc::new(book),
        }
    }

    /// Look up a PNR, materialized for today's date.
    pub fn get_pnr_status(&self, pnr: &PnrNumber) -> PnrStatus {
        self.get_pnr_status_on(pnr, Local::now().date_naive())
    }

    /// Look up a PNR, materialized for the given date.
    pub fn get_pnr_status_on(&self, pnr: &PnrNumber, today: NaiveDate) -> PnrStatus {
        self.book
            .pnrs
            .get(pnr.as_str())
            .unwrap_or(&self.book.fallback)
            .to_status(today)
    }

    /// Station name for a code, or the code itself when unknown.
    pub fn get_station_name(&self, code: &str) -> String {
        self.book
            .stations
            .get(code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// The fixed schedule, whatever the train.
    pub fn get_train_schedule(&self, _train_number: &str) -> Vec<ScheduleEntry> {
        self.book.schedule.clone()
    }

    /// PNR numbers with their own fixture.
    pub fn known_pnrs(&self) -> Vec<&str> {
        let mut pnrs: Vec<&str> = self.book.pnrs.keys().map(String::as_str).collect();
        pnrs.sort_unstable();
        pnrs
    }
}
