//! Row types, one per table.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{
    BerthAllocation, ListingStatus, PassengerStatus, PaymentStatus, PnrStatus, SeatType,
};

/// A registered account. Profile fields live on the same row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub upi_id: Option<String>,
    pub is_staff: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Cached PNR header.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PnrRecord {
    pub id: i64,
    pub pnr_number: String,
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    pub journey_date: NaiveDate,
    pub journey_date_estimated: bool,
    pub passenger_count: i64,
    pub travel_class: String,
    pub chart_prepared: bool,
    pub last_updated: DateTime<Utc>,
}

impl PnrRecord {
    /// Rebuild the provider shape from the stored header and passengers.
    ///
    /// Fields the table does not keep (fare, quota, times) come back empty.
    pub fn to_status(&self, passengers: &[PassengerRow]) -> PnrStatus {
        PnrStatus {
            train_number: self.train_number.clone(),
            train_name: self.train_name.clone(),
            source_station: self.source_station.clone(),
            destination_station: self.destination_station.clone(),
            source_station_code: self.source_station_code.clone(),
            destination_station_code: self.destination_station_code.clone(),
            journey_date: self.journey_date,
            journey_date_estimated: self.journey_date_estimated,
            passenger_count: u32::try_from(self.passenger_count).unwrap_or(0),
            chart_prepared: self.chart_prepared,
            travel_class: self.travel_class.clone(),
            passengers: passengers.iter().map(PassengerRow::to_status).collect(),
            booking_fare: None,
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
}

/// One passenger of a cached PNR.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PassengerRow {
    pub id: i64,
    pub pnr_record_id: i64,
    pub serial_number: i64,
    pub booking_status: String,
    pub booking_coach: String,
    pub booking_berth: String,
    pub booking_berth_code: String,
    pub current_status: String,
    pub current_coach: String,
    pub current_berth: String,
    pub current_berth_code: String,
}

impl PassengerRow {
    pub fn to_status(&self) -> PassengerStatus {
        PassengerStatus::new(
            u32::try_from(self.serial_number).unwrap_or(0),
            BerthAllocation::new(
                &self.booking_status,
                &self.booking_coach,
                &self.booking_berth,
                &self.booking_berth_code,
            ),
            BerthAllocation::new(
                &self.current_status,
                &self.current_coach,
                &self.current_berth,
                &self.current_berth_code,
            ),
        )
    }
}

/// The journey a user last verified, used as their default route.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JourneyProfile {
    pub user_id: i64,
    pub pnr_number: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    pub journey_date: NaiveDate,
    pub travel_class: String,
    pub updated_at: DateTime<Utc>,
}

/// A seat offered for exchange.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub owner_id: i64,
    pub pnr_number: String,
    pub train_number: String,
    pub train_name: String,
    pub source_station: String,
    pub destination_station: String,
    pub source_station_code: String,
    pub destination_station_code: String,
    pub journey_date: NaiveDate,
    pub seat_type: SeatType,
    pub seat_number: String,
    pub coach_number: String,
    pub price_paise: i64,
    pub description: Option<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking of a listing by a buyer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Exchange {
    pub id: i64,
    pub listing_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub exchange_amount_paise: i64,
    pub payment_status: PaymentStatus,
    pub payment_transaction_id: Option<String>,
    pub buyer_pnr: String,
    pub exchange_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
}

/// An exchange joined with its listing and both parties, for display.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExchangeDetail {
    pub id: i64,
    pub listing_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub buyer_username: String,
    pub seller_username: String,
    pub train_number: String,
    pub train_name: String,
    pub journey_date: NaiveDate,
    pub coach_number: String,
    pub seat_number: String,
    pub exchange_amount_paise: i64,
    pub payment_status: PaymentStatus,
    pub payment_transaction_id: Option<String>,
    pub buyer_pnr: String,
    pub exchange_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
}

/// Station code → name mapping.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StationCode {
    pub id: i64,
    pub station_code: String,
    pub station_name: String,
    pub state: Option<String>,
}
