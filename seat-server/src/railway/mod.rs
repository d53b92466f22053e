//! Railway status provider.
//!
//! Wraps the third-party IRCTC PNR status API behind the
//! [`RailwayProvider`] trait, with two implementations:
//! - [`RapidApiClient`] talks to the real HTTP API
//! - [`FixtureRailwayClient`] serves canned data from a [`FixtureBook`]
//!
//! Key characteristics of the upstream API:
//! - PNR status is keyed by the PNR in the URL path; station and schedule
//!   lookups take query-string parameters
//! - Success is flagged by `success` or `status` in the body, not only by
//!   the HTTP status
//! - Station fields in PNR responses are codes, not names

mod client;
mod convert;
mod error;
mod fixture;
mod provider;
mod types;

pub use client::{DEFAULT_API_HOST, RailwayConfig, RapidApiClient};
pub use convert::{ConversionError, DateParse, chart_prepared, normalize_pnr, parse_journey_date};
pub use error::RailwayError;
pub use fixture::{FixtureBook, FixturePnr, FixtureRailwayClient};
pub use provider::{ProviderConfig, ProviderKind, RailwayProvider, build_provider};
pub use types::{ApiEnvelope, RawPassenger, RawPnrData, RawStation};
