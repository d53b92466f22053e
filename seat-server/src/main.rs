use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use seat_server::config::AppConfig;
use seat_server::exchange::PnrCache;
use seat_server::railway::build_provider;
use seat_server::stations::{DirectoryConfig, StationDirectory};
use seat_server::store;
use seat_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seat_server=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let pool = store::create_pool(&config.database_url).await?;
    store::health_check(&pool).await?;
    store::run_migrations(&pool).await?;
    tracing::info!(database = %config.database_url, "database ready");

    let provider = build_provider(&config.provider)?;
    tracing::info!(kind = ?config.provider.kind, "railway provider ready");

    let stations = StationDirectory::new(pool.clone(), provider.clone(), &DirectoryConfig::default());
    if config.load_station_seed {
        let report = stations.load_seed().await?;
        tracing::info!(
            created = report.created,
            existing = report.existing,
            "station seed loaded"
        );
    }

    let pnr_cache = PnrCache::new(pool.clone(), provider.clone()).with_ttl(config.pnr_cache_ttl);
    let state = AppState::new(pool, pnr_cache, provider, stations, config.jwt.clone());
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Seat exchange listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
