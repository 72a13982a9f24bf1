use crate::config::AppConfig;
use crate::models::{Interval, StatValue};
use crate::services::normalize;
use crate::services::stock_stats;
use crate::services::TwelveDataClient;

pub async fn run(symbol: String, interval_raw: String) {
    let interval = match interval_raw.parse::<Interval>() {
        Ok(interval) => interval,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

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

    println!("Fetching {} at {}...", symbol, interval);

    let payload = match client.fetch_time_series(&symbol, interval).await {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("Fetch failed: {}", e);
            std::process::exit(1);
        }
    };

    let series = match normalize::to_price_series(&payload, interval) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("Normalization failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Exchange:  {} ({})", series.exchange, series.timezone);
    println!("Points:    {}", series.points.len());
    if let (Some(first), Some(last)) = (series.points.first(), series.points.last()) {
        println!("Range:     {} .. {}", first.at, last.at);
        println!("Last close: {}", last.close);
    }

    let stats = stock_stats::evaluate_stats(&series, &series.symbol);
    println!("Cumulative return:            {}", format_stat(stats.cumulative_return));
    println!("Annualized return (1y):       {}", format_stat(stats.annualized_cumulative_return));
    println!("Annualized volatility:        {}", format_stat(stats.annualized_volatility));
}

fn format_stat(value: StatValue) -> String {
    match value {
        StatValue::Value(v) => format!("{:.2}%", v),
        StatValue::Unavailable => "unavailable".to_string(),
    }
}
