//! Railway API response DTOs.
//!
//! These types map directly to the upstream JSON responses. Every field is
//! optional because the API omits fields freely, and numeric fields that
//! sometimes arrive as strings are kept as raw JSON values until conversion.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ScheduleEntry;

/// Top-level response wrapper shared by all endpoints.
///
/// Success is signalled by either `success: true` or `status: true`
/// depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: Option<bool>,
    pub status: Option<bool>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.success == Some(true) || self.status == Some(true)
    }

    /// The API's own message, or a placeholder.
    pub fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

/// The `data` object of a PNR status response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPnrData {
    pub pnr_number: Option<String>,
    pub train_number: Option<String>,
    pub train_name: Option<String>,
    /// Origin station code (not a name).
    pub source_station: Option<String>,
    /// Destination station code (not a name).
    pub destination_station: Option<String>,
    pub boarding_point: Option<String>,
    pub reservation_upto: Option<String>,
    /// Free text like "Feb 9, 2025 11:30:05 AM".
    pub date_of_journey: Option<String>,
    /// Travel class, e.g. "3A", "SL". Copied verbatim.
    pub journey_class: Option<String>,
    /// e.g. "Chart Not Prepared".
    pub chart_status: Option<String>,
    #[serde(rename = "numberOfpassenger")]
    pub number_of_passenger: Option<Value>,
    pub passenger_list: Option<Vec<RawPassenger>>,
    pub booking_fare: Option<Value>,
    pub ticket_fare: Option<Value>,
    pub quota: Option<String>,
    pub booking_date: Option<String>,
    pub arrival_date: Option<String>,
    pub distance: Option<Value>,
    pub mobile_number: Option<String>,
}

/// One entry of `passengerList`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPassenger {
    pub passenger_serial_number: Option<Value>,
    pub booking_status: Option<String>,
    pub booking_coach_id: Option<String>,
    pub booking_berth_no: Option<Value>,
    pub booking_berth_code: Option<String>,
    pub current_status: Option<String>,
    pub current_coach_id: Option<String>,
    pub current_berth_no: Option<Value>,
    pub current_berth_code: Option<String>,
}

/// The `data` object of a station lookup response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStation {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Response from `getPNRStatus`.
pub type PnrResponse = ApiEnvelope<RawPnrData>;

/// Response from `getStationByCode`.
pub type StationResponse = ApiEnvelope<RawStation>;

/// Response from `trainSchedule`.
pub type ScheduleResponse = ApiEnvelope<Vec<ScheduleEntry>>;
