//! Marketplace state enums.
//!
//! Stored as upper-case text in the database and serialized the same way
//! over the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Lifecycle of a seat listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Available,
    Booked,
    Completed,
    Cancelled,
}

/// Payment state of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Completed,
    Cancelled,
}

/// Berth position of a listed seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Lower,
    Middle,
    Upper,
    SideLower,
    SideUpper,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "AVAILABLE",
            ListingStatus::Booked => "BOOKED",
            ListingStatus::Completed => "COMPLETED",
            ListingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl SeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Lower => "LOWER",
            SeatType::Middle => "MIDDLE",
            SeatType::Upper => "UPPER",
            SeatType::SideLower => "SIDE_LOWER",
            SeatType::SideUpper => "SIDE_UPPER",
        }
    }

    /// Human-readable label, e.g. "Side Lower".
    pub fn label(&self) -> &'static str {
        match self {
            SeatType::Lower => "Lower",
            SeatType::Middle => "Middle",
            SeatType::Upper => "Upper",
            SeatType::SideLower => "Side Lower",
            SeatType::SideUpper => "Side Upper",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(ListingStatus::Available),
            "BOOKED" => Ok(ListingStatus::Booked),
            "COMPLETED" => Ok(ListingStatus::Completed),
            "CANCELLED" => Ok(ListingStatus::Cancelled),
            _ => Err(DomainError::UnknownVariant {
                kind: "listing status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            "COMPLETED" => Ok(PaymentStatus::Completed),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            _ => Err(DomainError::UnknownVariant {
                kind: "payment status",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SeatType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "LOWER" => Ok(SeatType::Lower),
            "MIDDLE" => Ok(SeatType::Middle),
            "UPPER" => Ok(SeatType::Upper),
            "SIDE_LOWER" => Ok(SeatType::SideLower),
            "SIDE_UPPER" => Ok(SeatType::SideUpper),
            _ => Err(DomainError::UnknownVariant {
                kind: "seat type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_status_roundtrip() {
        for status in [
            ListingStatus::Available,
            ListingStatus::Booked,
            ListingStatus::Completed,
            ListingStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ListingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn seat_type_accepts_labels() {
        assert_eq!("Side Lower".parse::<SeatType>().unwrap(), SeatType::SideLower);
        assert_eq!("side-upper".parse::<SeatType>().unwrap(), SeatType::SideUpper);
        assert_eq!("LOWER".parse::<SeatType>().unwrap(), SeatType::Lower);
    }

    #[test]
    fn unknown_variant_error() {
        let err = "WAITLIST".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown payment status: WAITLIST");
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&SeatType::SideLower).unwrap();
        assert_eq!(json, "\"SIDE_LOWER\"");
        let status: PaymentStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);
    }
}
