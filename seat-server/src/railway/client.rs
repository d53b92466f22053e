//! RapidAPI IRCTC HTTP client.
//!
//! Provides async methods for querying PNR status, station names and train
//! schedules. There is no retry or backoff: one request per call, bounded
//! only by the configured timeout.

use chrono::{Local, NaiveDate};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::domain::{PnrNumber, PnrStatus, ScheduleEntry};

use super::convert::{ConversionError, normalize_pnr};
use super::error::RailwayError;
use super::types::{ApiEnvelope, PnrResponse, ScheduleResponse, StationResponse};

/// Default RapidAPI host for the IRCTC PNR API.
pub const DEFAULT_API_HOST: &str = "irctc-indian-railway-pnr-status.p.rapidapi.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the RapidAPI client.
#[derive(Debug, Clone)]
pub struct RailwayConfig {
    /// RapidAPI key, sent as `x-rapidapi-key`
    pub api_key: String,
    /// RapidAPI host, sent as `x-rapidapi-host`
    pub api_host: String,
    /// Base URL for the API (defaults to `https://{api_host}`)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RailwayConfig {
    /// Create a new config with the given API key and the default host.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            base_url: format!("https://{DEFAULT_API_HOST}"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the RapidAPI host. Also points the base URL at it.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self.base_url = format!("https://{}", self.api_host);
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// RapidAPI IRCTC client.
#[derive(Debug, Clone)]
pub struct RapidApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RapidApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RailwayConfig) -> Result<Self, RailwayError> {
        if config.api_key.is_empty() {
            return Err(RailwayError::NotConfigured(
                "RAILWAY_API_KEY is required for the live provider".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| RailwayError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        let api_host = HeaderValue::from_str(&config.api_host).map_err(|_| RailwayError::Api {
            status: 0,
            message: "Invalid API host format".to_string(),
        })?;
        headers.insert(HeaderName::from_static("x-rapidapi-key"), api_key);
        headers.insert(HeaderName::from_static("x-rapidapi-host"), api_host);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and normalize the status of a PNR.
    pub async fn get_pnr_status(&self, pnr: &PnrNumber) -> Result<PnrStatus, RailwayError> {
        let url = format!("{}/getPNRStatus/{}", self.base_url, pnr.as_str());
        let response: PnrResponse = self.get_json(&url, &[]).await?;

        if !response.is_success() {
            return Err(RailwayError::Rejected {
                message: response.message_or_default(),
            });
        }

        let data = response.data.ok_or(ConversionError::MissingField("data"));
        let today: NaiveDate = Local::now().date_naive();

        data.and_then(|data| normalize_pnr(&data, today))
            .map_err(|e| RailwayError::Json {
                message: e.to_string(),
                body: None,
            })
    }

    /// Look up a station's name by code.
    ///
    /// Returns `Ok(None)` when the API answers but does not know the code.
    pub async fn get_station_name(&self, code: &str) -> Result<Option<String>, RailwayError> {
        let url = format!("{}/api/v3/getStationByCode", self.base_url);
        let response: StationResponse = self.get_json(&url, &[("stationCode", code)]).await?;

        if !response.is_success() {
            return Ok(None);
        }

        Ok(response.data.and_then(|d| d.name).filter(|n| !n.is_empty()))
    }

    /// Fetch the timetable of a train.
    pub async fn get_train_schedule(
        &self,
        train_number: &str,
    ) -> Result<Vec<ScheduleEntry>, RailwayError> {
        let url = format!("{}/api/v3/trainSchedule", self.base_url);
        let response: ScheduleResponse = self
            .get_json(&url, &[("trainNumber", train_number)])
            .await?;

        if !response.is_success() {
            return Err(RailwayError::Rejected {
                message: response.message_or_default(),
            });
        }

        Ok(response.data.unwrap_or_default())
    }

    /// Issue a GET and decode the JSON envelope.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiEnvelope<T>, RailwayError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RailwayError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RailwayError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RailwayError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| RailwayError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
