//! Normalized PNR and schedule shapes.
//!
//! These are the canonical forms every railway provider returns and the
//! PNR cache hands to the marketplace. Raw upstream field names never
//! leave the `railway` module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Seat allocation of one passenger at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BerthAllocation {
    /// Reservation status, e.g. "CNF", "RAC", "WL".
    pub status: String,
    /// Coach identifier, e.g. "B1".
    pub coach: String,
    /// Berth number within the coach.
    pub berth: String,
    /// Berth position code, e.g. "LB", "SU".
    pub berth_code: String,
}

impl BerthAllocation {
    /// Build an allocation from its four parts.
    pub fn new(
        status: impl Into<String>,
        coach: impl Into<String>,
        berth: impl Into<String>,
        berth_code: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            coach: coach.into(),
            berth: berth.into(),
            berth_code: berth_code.into(),
        }
    }

    /// Display form `"<status>/<coach>/<berth>/<berthCode>"`.
    pub fn display(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.status, self.coach, self.berth, self.berth_code
        )
    }
}

/// One passenger on a PNR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerStatus {
    pub serial_number: u32,
    /// Allocation at booking time.
    pub booking: BerthAllocation,
    /// Allocation now (after charting, upgrades, RAC clearance).
    pub current: BerthAllocation,
    /// Derived from `current`, e.g. "CNF/B1/23/LB".
    pub status_display: String,
}

impl PassengerStatus {
    pub fn new(serial_number: u32, booking: BerthAllocation, current: BerthAllocation) -> Self {
        let status_display = current.display();
        Self {
            serial_number,
            booking,
            current,
            status_display,
        }
    }
}

/// Canonical PNR status.
///
/// The fields from `booking_fare` down are only known when the record came
/// straight from a provider; a cache hit leaves them empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PnrStatus {
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    pub journey_date: NaiveDate,
    /// True when `journey_date` is a fallback rather than a parsed value.
    pub journey_date_estimated: bool,
    pub passenger_count: u32,
    pub chart_prepared: bool,
    pub travel_class: String,
    #[serde(default)]
    pub passengers: Vec<PassengerStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_fare: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl PnrStatus {
    /// Whether this PNR travels the same source/destination codes as another route.
    pub fn same_route(&self, source_code: &str, destination_code: &str) -> bool {
        self.source_station_code == source_code && self.destination_station_code == destination_code
    }
}

/// One stop in a train's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(alias = "stationName")]
    pub station_name: String,
    #[serde(alias = "stationCode")]
    pub station_code: String,
    #[serde(alias = "arrivalTime", default)]
    pub arrival_time: String,
    #[serde(alias = "departureTime", default)]
    pub departure_time: String,
    #[serde(default)]
    pub distance: u32,
    #[serde(default)]
    pub day: u32,
}
