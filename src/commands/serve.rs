use crate::config::AppConfig;
use crate::server;
use crate::services::{DataStore, DataSync, HealthStats, TwelveDataClient};
use crate::worker;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

pub async fn run(port_override: Option<u16>) {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = port_override {
        config.port = port;
    }

    println!("Starting stockboard server on port {}", config.port);

    let store = Arc::new(DataStore::new());

    let client = match TwelveDataClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create provider client: {}", e);
            std::process::exit(1);
        }
    };
    let sync = Arc::new(DataSync::new(client, store.clone()));

    let start_time = Instant::now();
    let shared_health_stats = Arc::new(RwLock::new(HealthStats::default()));

    // Spawn market-session worker
    let worker_sync = sync.clone();
    let worker_health = shared_health_stats.clone();
    let open_interval_secs = config.market_refresh_secs;
    tokio::spawn(async move {
        worker::run_market_worker(worker_sync, worker_health, open_interval_secs).await;
    });

    // Spawn uptime tracker
    let uptime_health_stats = shared_health_stats.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
            let mut health = uptime_health_stats.write().await;
            health.uptime_secs = start_time.elapsed().as_secs();
        }
    });

    if let Err(e) = server::serve(&config, store, sync, shared_health_stats).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
