//! In-memory row store
//!
//! Series are keyed by (symbol, interval), market sessions by exchange.
//! Writes are whole-record replacements; readers get clones and never
//! observe a half-written row.

use crate::models::{Interval, MarketSession, PriceSeries};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

type SeriesKey = (String, Interval);

#[derive(Default)]
pub struct DataStore {
    series: RwLock<HashMap<SeriesKey, PriceSeries>>,
    sessions: RwLock<HashMap<String, MarketSession>>,
}

// Shared data store for passing between tasks
pub type SharedDataStore = Arc<DataStore>;

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, symbol: &str, interval: Interval) -> Option<PriceSeries> {
        let series = self.series.read().await;
        series.get(&(symbol.to_string(), interval)).cloned()
    }

    /// Replace the stored series for its (symbol, interval) key.
    pub async fn put(&self, series: PriceSeries) {
        debug!(
            symbol = %series.symbol,
            interval = %series.interval,
            points = series.points.len(),
            "Storing series"
        );
        let key = (series.symbol.clone(), series.interval);
        self.series.write().await.insert(key, series);
    }

    /// Flip the staleness flag on one series. Returns false when the key
    /// does not exist.
    pub async fn set_market_checked(
        &self,
        symbol: &str,
        interval: Interval,
        checked: bool,
    ) -> bool {
        let mut series = self.series.write().await;
        match series.get_mut(&(symbol.to_string(), interval)) {
            Some(entry) => {
                entry.market_checked = checked;
                true
            }
            None => false,
        }
    }

    pub async fn get_session(&self, exchange: &str) -> Option<MarketSession> {
        self.sessions.read().await.get(exchange).cloned()
    }

    /// Upsert one exchange's session. A closed→open transition clears the
    /// staleness flag on every series of that exchange, re-arming the
    /// refetch-once behavior for the next closure.
    pub async fn put_session(&self, session: MarketSession) {
        let was_open = {
            let sessions = self.sessions.read().await;
            sessions
                .get(&session.exchange)
                .map(|s| s.is_market_open)
                .unwrap_or(false)
        };

        if session.is_market_open && !was_open {
            let mut series = self.series.write().await;
            let mut cleared = 0usize;
            for entry in series.values_mut() {
                if entry.exchange == session.exchange && entry.market_checked {
                    entry.market_checked = false;
                    cleared += 1;
                }
            }
            if cleared > 0 {
                info!(
                    exchange = %session.exchange,
                    cleared,
                    "Market opened, cleared staleness flags"
                );
            }
        }

        self.sessions
            .write()
            .await
            .insert(session.exchange.clone(), session);
    }

    /// All known sessions, ordered by exchange name.
    pub async fn sessions(&self) -> Vec<MarketSession> {
        let mut all: Vec<MarketSession> = self.sessions.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.exchange.cmp(&b.exchange));
        all
    }

    pub async fn series_count(&self) -> usize {
        self.series.read().await.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Health statistics surfaced by the /health endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct HealthStats {
    pub uptime_secs: u64,
    pub series_count: usize,
    pub session_count: usize,
    pub market_iteration_count: u64,
    pub market_last_check: Option<String>,
    pub any_market_open: bool,
    pub current_system_time: String,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            uptime_secs: 0,
            series_count: 0,
            session_count: 0,
            market_iteration_count: 0,
            market_last_check: None,
            any_market_open: false,
            current_system_time: Utc::now().to_rfc3339(),
        }
    }
}

pub type SharedHealthStats = Arc<RwLock<HealthStats>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;
    use chrono::{DateTime, Duration};

    fn series(symbol: &str, exchange: &str, market_checked: bool) -> PriceSeries {
        PriceSeries {
            symbol: symbol.to_string(),
            exchange: exchange.to_string(),
            timezone: "America/New_York".to_string(),
            interval: Interval::Day1,
            points: vec![PricePoint {
                at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
                close: 100.0,
            }],
            market_checked,
        }
    }

    fn session(exchange: &str, open: bool) -> MarketSession {
        MarketSession {
            exchange: exchange.to_string(),
            country: "United States".to_string(),
            is_market_open: open,
            time_to_open: Duration::zero(),
            time_to_close: Duration::zero(),
            checked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_put_replaces_whole_record() {
        let store = DataStore::new();
        store.put(series("AAPL", "NASDAQ", true)).await;

        let mut replacement = series("AAPL", "NASDAQ", false);
        replacement.points.push(PricePoint {
            at: DateTime::from_timestamp(86_400, 0).unwrap().naive_utc(),
            close: 101.0,
        });
        store.put(replacement).await;

        let stored = store.get("AAPL", Interval::Day1).await.unwrap();
        assert_eq!(stored.points.len(), 2);
        assert!(!stored.market_checked);
        assert_eq!(store.series_count().await, 1);
    }

    #[tokio::test]
    async fn test_series_are_keyed_by_symbol_and_interval() {
        let store = DataStore::new();
        store.put(series("AAPL", "NASDAQ", false)).await;

        let mut hourly = series("AAPL", "NASDAQ", false);
        hourly.interval = Interval::Hour1;
        store.put(hourly).await;

        assert_eq!(store.series_count().await, 2);
        assert!(store.get("AAPL", Interval::Hour1).await.is_some());
        assert!(store.get("AAPL", Interval::Week1).await.is_none());
    }

    #[tokio::test]
    async fn test_set_market_checked_on_missing_key() {
        let store = DataStore::new();
        assert!(!store.set_market_checked("AAPL", Interval::Day1, true).await);
    }

    #[tokio::test]
    async fn test_market_open_transition_clears_flags() {
        let store = DataStore::new();
        store.put(series("AAPL", "NASDAQ", true)).await;
        store.put(series("MSFT", "NASDAQ", true)).await;
        store.put(series("AIR", "Euronext", true)).await;
        store.put_session(session("NASDAQ", false)).await;

        // Closed→open clears NASDAQ flags only.
        store.put_session(session("NASDAQ", true)).await;

        assert!(!store.get("AAPL", Interval::Day1).await.unwrap().market_checked);
        assert!(!store.get("MSFT", Interval::Day1).await.unwrap().market_checked);
        assert!(store.get("AIR", Interval::Day1).await.unwrap().market_checked);

        // Open→open is not a transition; flags stay put.
        store.set_market_checked("AAPL", Interval::Day1, true).await;
        store.put_session(session("NASDAQ", true)).await;
        assert!(store.get("AAPL", Interval::Day1).await.unwrap().market_checked);
    }

    #[tokio::test]
    async fn test_sessions_are_sorted_by_exchange() {
        let store = DataStore::new();
        store.put_session(session("NYSE", true)).await;
        store.put_session(session("Euronext", false)).await;

        let sessions = store.sessions().await;
        let names: Vec<&str> = sessions.iter().map(|s| s.exchange.as_str()).collect();
        assert_eq!(names, vec!["Euronext", "NYSE"]);
    }
}
