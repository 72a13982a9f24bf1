use crate::config::AppConfig;
use crate::services::normalize;
use crate::services::TwelveDataClient;
use chrono::Utc;

pub async fn run() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match TwelveDataClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create provider client: {}", e);
            std::process::exit(1);
        }
    };

    let rows = match client.fetch_market_state().await {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Fetch failed: {}", e);
            std::process::exit(1);
        }
    };

    let sessions = match normalize::to_market_sessions(&rows, Utc::now()) {
        Ok(sessions) => sessions,
        Err(e) => {
            eprintln!("Normalization failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{} exchanges:", sessions.len());
    for session in sessions {
        let state = if session.is_market_open {
            format!("open, closes in {}", format_duration(session.time_to_close))
        } else {
            format!("closed, opens in {}", format_duration(session.time_to_open))
        };
        println!("  {:<20} {:<20} {}", session.exchange, session.country, state);
    }
}

fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
