//! Railway API error types.

use std::fmt;

/// Errors from the railway status HTTP client.
///
/// These never cross the [`RailwayProvider`](super::RailwayProvider) seam:
/// provider implementations log them and return their fallback value.
#[derive(Debug)]
pub enum RailwayError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// API answered 200 but flagged the request as unsuccessful
    Rejected { message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid API key or unauthorized
    Unauthorized,

    /// Provider not configured (e.g. live provider without an API key)
    NotConfigured(String),
}

impl fmt::Display for RailwayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailwayError::Http(e) => write!(f, "HTTP error: {e}"),
            RailwayError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RailwayError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            RailwayError::Rejected { message } => write!(f, "request rejected: {message}"),
            RailwayError::RateLimited => write!(f, "rate limited by railway API"),
            RailwayError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            RailwayError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for RailwayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RailwayError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RailwayError {
    fn from(err: reqwest::Error) -> Self {
        RailwayError::Http(err)
    }
}
