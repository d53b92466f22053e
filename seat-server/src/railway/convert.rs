//! Conversion from raw railway DTOs to the normalized PNR shape.
//!
//! Most fields are plain renames. The exceptions are the journey date,
//! which arrives as free text and may fall back to "today", the chart
//! flag, and the passenger count, which falls back to the passenger list.

use chrono::NaiveDate;
use serde_json::Value;

use crate::domain::{BerthAllocation, PassengerStatus, PnrStatus};

use super::types::{RawPassenger, RawPnrData};

/// Literal chart status meaning seats are not yet final.
const CHART_NOT_PREPARED: &str = "chart not prepared";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but of an unusable shape
    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Outcome of parsing `dateOfJourney`.
///
/// Keeps a verified date apart from one that had to be substituted, so
/// callers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParse {
    /// Date parsed from the upstream text.
    Parsed(NaiveDate),
    /// No date supplied.
    Missing,
    /// Date supplied but not in the expected `"<Mon> <day>, <year> ..."` form.
    Unparseable(String),
}

impl DateParse {
    /// The usable date plus whether it is a fallback.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, bool) {
        match self {
            DateParse::Parsed(date) => (*date, false),
            DateParse::Missing | DateParse::Unparseable(_) => (today, true),
        }
    }
}

/// Parse a journey date like `"Feb 9, 2025 11:30:05 AM"`.
///
/// Only the first three whitespace-separated tokens (month abbreviation,
/// `"day,"`, year) are used; the time of day is discarded.
pub fn parse_journey_date(raw: Option<&str>) -> DateParse {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return DateParse::Missing;
    };

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 3 {
        return DateParse::Unparseable(raw.to_string());
    }

    let month = tokens[0];
    let day = tokens[1].trim_end_matches(',');
    let year = tokens[2];

    match NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%b %d %Y") {
        Ok(date) => DateParse::Parsed(date),
        Err(_) => DateParse::Unparseable(raw.to_string()),
    }
}

/// Whether the chart is prepared, given the raw chart status text.
///
/// Anything other than "chart not prepared" (in any casing) counts as
/// prepared, including an absent status.
pub fn chart_prepared(chart_status: Option<&str>) -> bool {
    !chart_status
        .unwrap_or_default()
        .eq_ignore_ascii_case(CHART_NOT_PREPARED)
}

/// Convert the raw `data` object of a PNR response.
///
/// `today` is substituted when the journey date is missing or unparseable;
/// the returned status then has `journey_date_estimated` set.
pub fn normalize_pnr(data: &RawPnrData, today: NaiveDate) -> Result<PnrStatus, ConversionError> {
    let date_parse = parse_journey_date(data.date_of_journey.as_deref());
    if let DateParse::Unparseable(raw) = &date_parse {
        tracing::warn!(raw = %raw, "unparseable dateOfJourney, using today's date");
    }
    let (journey_date, journey_date_estimated) = date_parse.resolve(today);

    let raw_passengers = data.passenger_list.as_deref().unwrap_or(&[]);
    let passengers = raw_passengers
        .iter()
        .enumerate()
        .map(|(idx, p)| convert_passenger(p, idx))
        .collect::<Result<Vec<_>, _>>()?;

    let explicit_count = scalar_to_u32("numberOfpassenger", data.number_of_passenger.as_ref())?;
    let passenger_count = match explicit_count {
        Some(n) => n,
        None => u32::try_from(raw_passengers.len()).map_err(|_| ConversionError::InvalidField {
            field: "passengerList",
            value: format!("{} entries", raw_passengers.len()),
        })?,
    };

    let booking_fare = match scalar_to_string("bookingFare", data.booking_fare.as_ref())? {
        fare if fare.is_empty() => "0".to_string(),
        fare => fare,
    };

    let source_code = data.source_station.clone().unwrap_or_default();
    let destination_code = data.destination_station.clone().unwrap_or_default();

    Ok(PnrStatus {
        train_number: data.train_number.clone().unwrap_or_default(),
        train_name: data.train_name.clone().unwrap_or_default(),
        // Names are filled in later by the station directory, if at all
        source_station: source_code.clone(),
        destination_station: destination_code.clone(),
        source_station_code: source_code,
        destination_station_code: destination_code,
        journey_date,
        journey_date_estimated,
        passenger_count,
        chart_prepared: chart_prepared(data.chart_status.as_deref()),
        travel_class: data.journey_class.clone().unwrap_or_default(),
        passengers,
        booking_fare: Some(booking_fare),
        quota: data.quota.clone(),
        booking_date: data.booking_date.clone(),
        arrival_date: data.arrival_date.clone(),
        distance: scalar_to_u32("distance", data.distance.as_ref())?,
        mobile_number: data.mobile_number.clone(),
        departure_time: None,
        arrival_time: None,
        duration: None,
    })
}

fn convert_passenger(p: &RawPassenger, idx: usize) -> Result<PassengerStatus, ConversionError> {
    let explicit_serial =
        scalar_to_u32("passengerSerialNumber", p.passenger_serial_number.as_ref())?;
    let serial_number = match explicit_serial {
        Some(n) => n,
        None => u32::try_from(idx + 1).map_err(|_| ConversionError::InvalidField {
            field: "passengerSerialNumber",
            value: idx.to_string(),
        })?,
    };

    let booking = BerthAllocation::new(
        p.booking_status.clone().unwrap_or_default(),
        p.booking_coach_id.clone().unwrap_or_default(),
        scalar_to_string("bookingBerthNo", p.booking_berth_no.as_ref())?,
        p.booking_berth_code.clone().unwrap_or_default(),
    );
    let current = BerthAllocation::new(
        p.current_status.clone().unwrap_or_default(),
        p.current_coach_id.clone().unwrap_or_default(),
        scalar_to_string("currentBerthNo", p.current_berth_no.as_ref())?,
        p.current_berth_code.clone().unwrap_or_default(),
    );

    Ok(PassengerStatus::new(serial_number, booking, current))
}

/// Render a JSON scalar as text. Absent and null become the empty string.
fn scalar_to_string(field: &'static str, value: Option<&Value>) -> Result<String, ConversionError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(ConversionError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn scalar_to_u32(field: &'static str, value: Option<&Value>) -> Result<Option<u32>, ConversionError> {
    let invalid = |v: &Value| ConversionError::InvalidField {
        field,
        value: v.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}
