//! Station directory error types.

/// Errors from the station directory.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Reading or writing `station_codes` failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
