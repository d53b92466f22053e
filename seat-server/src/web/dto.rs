//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::Stage;
use crate::domain::{PnrStatus, ScheduleEntry};
use crate::exchange::{RouteQuery, RouteSearch};
use crate::store::{JourneyProfile, Listing, User};

/// Step one of login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A PNR submitted for verification.
#[derive(Debug, Deserialize)]
pub struct PnrRequest {
    pub pnr_number: String,
}

/// Booking a listing.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    /// The buyer's own PNR, which must travel the listing's route
    pub buyer_pnr: String,
}

/// Confirming payment for an exchange.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub transaction_id: String,
}

/// Query string of the browse page.
///
/// Everything is a string so that empty form fields mean "not given".
#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub source_station: Option<String>,
    pub destination_station: Option<String>,
    pub journey_date: Option<String>,
    pub travel_class: Option<String>,
}

impl BrowseParams {
    /// Convert to a search, rejecting malformed dates.
    pub fn to_search(&self) -> Result<RouteSearch, String> {
        let journey_date = match self.journey_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| format!("Invalid journey date: {s}"))?,
            ),
        };

        Ok(RouteSearch {
            source: self.source_station.clone(),
            destination: self.destination_station.clone(),
            date: journey_date,
            travel_class: self.travel_class.clone(),
        })
    }
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResult {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub upi_id: Option<String>,
    pub is_staff: bool,
    pub is_verified: bool,
}

impl From<&User> for UserResult {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            phone_number: u.phone_number.clone(),
            upi_id: u.upi_id.clone(),
            is_staff: u.is_staff,
            is_verified: u.is_verified,
        }
    }
}

/// A signed session token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub stage: Stage,
    pub user: UserResult,
}

/// Result of the PNR login step.
#[derive(Debug, Serialize)]
pub struct JourneyLoginResponse {
    pub token: String,
    pub stage: Stage,
    pub profile: JourneyProfile,
    pub pnr_status: PnrStatus,
}

/// Ajax-style PNR verification result.
#[derive(Debug, Serialize)]
pub struct PnrVerifyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PnrStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PnrVerifyResponse {
    pub fn verified(status: PnrStatus) -> Self {
        Self {
            success: true,
            data: Some(status),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// The effective filter of a browse request.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub journey_date: Option<NaiveDate>,
    pub travel_class: Option<String>,
}

impl From<&RouteQuery> for QueryResult {
    fn from(q: &RouteQuery) -> Self {
        Self {
            source: q.source.clone(),
            destination: q.destination.clone(),
            journey_date: q.date,
            travel_class: q.travel_class.clone(),
        }
    }
}

/// Browse results.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub query: QueryResult,
    pub listings: Vec<Listing>,
}

/// Station lookup result.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub code: String,
    pub name: String,
}

/// Train timetable.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub train_number: String,
    pub schedule: Vec<ScheduleEntry>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
