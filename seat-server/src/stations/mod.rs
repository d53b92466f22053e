//! Station code → name lookup.
//!
//! Names come from, in order: an in-memory cache, the `station_codes`
//! table, and the railway provider. Provider answers are written back to
//! the table so each code is fetched upstream at most once.

mod directory;
mod error;
mod seed;

pub use directory::{DirectoryConfig, SeedReport, StationDirectory};
pub use error::StationError;
pub use seed::{SeedStation, seed_stations};
