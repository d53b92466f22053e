//! Server configuration from environment variables.

use std::str::FromStr;

use chrono::TimeDelta;

use crate::auth::JwtConfig;
use crate::railway::{DEFAULT_API_HOST, ProviderConfig, ProviderKind, RailwayConfig};

const DEFAULT_DATABASE_URL: &str = "sqlite://seatswap.db?mode=rwc";
const DEV_JWT_SECRET: &str = "seatswap-development-secret-do-not-deploy";

/// A variable was set to something unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is required")]
    Missing { name: &'static str },

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub provider: ProviderConfig,
    /// How long a cached PNR stays fresh.
    pub pnr_cache_ttl: TimeDelta,
    /// Insert the station seed at startup.
    pub load_station_seed: bool,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// | Env Var                | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `DATABASE_URL`         | `sqlite://seatswap.db?mode=rwc`          |
    /// | `HOST`                 | `127.0.0.1`                              |
    /// | `PORT`                 | `3000`                                   |
    /// | `JWT_SECRET`           | required unless `SEATSWAP_DEV=1`         |
    /// | `JWT_EXPIRY_MINS`      | `720`                                    |
    /// | `RAILWAY_PROVIDER`     | `fixture`                                |
    /// | `RAILWAY_API_KEY`      | empty                                    |
    /// | `RAILWAY_API_HOST`     | the IRCTC RapidAPI host                  |
    /// | `RAILWAY_TIMEOUT_SECS` | `10`                                     |
    /// | `PNR_CACHE_TTL_HOURS`  | `24`                                     |
    /// | `LOAD_STATION_SEED`    | `true`                                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = parse(&get, "PORT", 3000u16)?;

        let dev_mode = parse_flag(&get, "SEATSWAP_DEV", false)?;
        let secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if dev_mode => DEV_JWT_SECRET.to_string(),
            None => return Err(ConfigError::Missing { name: "JWT_SECRET" }),
        };
        let expiry_mins = parse(&get, "JWT_EXPIRY_MINS", 720i64)?;
        positive("JWT_EXPIRY_MINS", expiry_mins)?;

        let kind = match get("RAILWAY_PROVIDER") {
            Some(v) => v.parse::<ProviderKind>().map_err(|reason| ConfigError::Invalid {
                name: "RAILWAY_PROVIDER",
                value: v.clone(),
                reason,
            })?,
            None => ProviderKind::default(),
        };
        let api_key = get("RAILWAY_API_KEY").unwrap_or_default();
        if kind == ProviderKind::Live && api_key.is_empty() {
            return Err(ConfigError::Missing {
                name: "RAILWAY_API_KEY",
            });
        }
        let api_host = get("RAILWAY_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.into());
        let timeout_secs = parse(&get, "RAILWAY_TIMEOUT_SECS", 10u64)?;

        let ttl_hours = parse(&get, "PNR_CACHE_TTL_HOURS", 24i64)?;
        positive("PNR_CACHE_TTL_HOURS", ttl_hours)?;

        let load_station_seed = parse_flag(&get, "LOAD_STATION_SEED", true)?;

        Ok(Self {
            database_url,
            host,
            port,
            jwt: JwtConfig {
                secret,
                expiry_mins,
            },
            provider: ProviderConfig {
                kind,
                railway: RailwayConfig::new(api_key)
                    .with_api_host(api_host)
                    .with_timeout(timeout_secs),
            },
            pnr_cache_ttl: TimeDelta::hours(ttl_hours),
            load_station_seed,
        })
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: v.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag<G>(get: &G, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value: v,
                reason: "expected true or false".into(),
            }),
        },
        None => Ok(default),
    }
}

fn positive(name: &'static str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}
