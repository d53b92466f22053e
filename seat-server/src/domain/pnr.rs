//! PNR number type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid PNR number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid PNR number: {reason}")]
pub struct InvalidPnr {
    reason: &'static str,
}

/// A valid 10-digit PNR (Passenger Name Record) number.
///
/// PNR numbers are always exactly 10 ASCII digits. This type guarantees
/// that any `PnrNumber` value is valid by construction.
///
/// # Examples
///
/// ```
/// use seat_server::domain::PnrNumber;
///
/// let pnr = PnrNumber::parse("8634824688").unwrap();
/// assert_eq!(pnr.as_str(), "8634824688");
///
/// // Surrounding whitespace is not trimmed
/// assert!(PnrNumber::parse(" 8634824688").is_err());
///
/// // Wrong length is rejected
/// assert!(PnrNumber::parse("863482468").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PnrNumber([u8; 10]);

impl PnrNumber {
    /// Parse a PNR number from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidPnr> {
        let bytes = s.as_bytes();

        if bytes.len() != 10 {
            return Err(InvalidPnr {
                reason: "must be exactly 10 digits",
            });
        }

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidPnr {
                reason: "must contain only digits",
            });
        }

        let mut digits = [0u8; 10];
        digits.copy_from_slice(bytes);
        Ok(PnrNumber(digits))
    }

    /// Parse user input, ignoring surrounding whitespace.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidPnr> {
        Self::parse(s.trim())
    }

    /// Returns the PNR number as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for PnrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PnrNumber({})", self.as_str())
    }
}

impl fmt::Display for PnrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PnrNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PnrNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PnrNumber::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}
