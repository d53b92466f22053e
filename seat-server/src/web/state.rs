//! Application state for the web layer.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtConfig;
use crate::exchange::PnrCache;
use crate::railway::RailwayProvider;
use crate::stations::StationDirectory;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,

    /// PNR status, cached in the database
    pub pnr_cache: Arc<PnrCache>,

    /// Railway provider, for lookups that bypass the cache
    pub provider: Arc<dyn RailwayProvider>,

    /// Station code → name lookup
    pub stations: StationDirectory,

    /// Session token settings
    pub jwt: Arc<JwtConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        pool: SqlitePool,
        pnr_cache: PnrCache,
        provider: Arc<dyn RailwayProvider>,
        stations: StationDirectory,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            pool,
            pnr_cache: Arc::new(pnr_cache),
            provider,
            stations,
            jwt: Arc::new(jwt),
        }
    }
}
