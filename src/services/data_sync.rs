//! Refresh orchestration
//!
//! Ties the pipeline together: store lookup → freshness decision →
//! optional provider call → validation → normalization → store write.
//! Withheld updates and missing session records are explicit outcomes,
//! not errors.

use crate::error::Result;
use crate::models::{Interval, MarketSession, PriceSeries};
use crate::services::data_store::SharedDataStore;
use crate::services::freshness::{self, Freshness};
use crate::services::normalize;
use crate::services::twelvedata::TwelveDataClient;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Result of running the freshness flow for one (symbol, interval) key.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The stored series was replaced with fresh provider data.
    Updated(PriceSeries),
    /// Cached data is fresh enough, or the update was deliberately
    /// withheld (market closed and already checked).
    NotModified,
    /// Nothing cached under this key; the create path applies instead.
    NoCache,
    /// Cached data is stale but its exchange has no session record.
    Conflict,
}

pub struct DataSync {
    client: TwelveDataClient,
    store: SharedDataStore,
}

impl DataSync {
    pub fn new(client: TwelveDataClient, store: SharedDataStore) -> Self {
        Self { client, store }
    }

    /// Create path: fetch a symbol from the provider and store it,
    /// replacing whatever was cached under the key.
    #[instrument(skip(self))]
    pub async fn create(&self, symbol: &str, interval: Interval) -> Result<PriceSeries> {
        self.fetch_and_store(symbol, interval, false).await
    }

    /// Update path: run the freshness state machine for one cached key.
    #[instrument(skip(self, now))]
    pub async fn refresh(
        &self,
        symbol: &str,
        interval: Interval,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome> {
        let cached = match self.store.get(symbol, interval).await {
            Some(series) => series,
            None => return Ok(RefreshOutcome::NoCache),
        };

        let session = self.store.get_session(&cached.exchange).await;
        let decision = freshness::assess(&cached, session.as_ref(), now);
        info!(symbol, interval = %interval, ?decision, "Freshness decision");

        match decision {
            Freshness::Fresh | Freshness::StaleMarketClosedVerified => {
                Ok(RefreshOutcome::NotModified)
            }
            Freshness::NoMarketData => Ok(RefreshOutcome::Conflict),
            Freshness::StaleMarketOpen => {
                // Trading is active: the flag is cleared even if the fetch
                // then fails, so the next closure gets its check again.
                self.store.set_market_checked(symbol, interval, false).await;
                let series = self.fetch_and_store(symbol, interval, false).await?;
                Ok(RefreshOutcome::Updated(series))
            }
            Freshness::StaleMarketClosedUnverified => {
                // Mark the closure as checked before the network call: one
                // attempt per closure, whether or not it succeeds.
                self.store.set_market_checked(symbol, interval, true).await;
                let series = self.fetch_and_store(symbol, interval, true).await?;
                Ok(RefreshOutcome::Updated(series))
            }
        }
    }

    /// Fetch, validate, normalize and store one series. On provider
    /// failure the stored series is left untouched.
    async fn fetch_and_store(
        &self,
        symbol: &str,
        interval: Interval,
        market_checked: bool,
    ) -> Result<PriceSeries> {
        let payload = self.client.fetch_time_series(symbol, interval).await?;
        let mut series = normalize::to_price_series(&payload, interval)?;
        series.market_checked = market_checked;

        self.store.put(series.clone()).await;
        info!(
            symbol,
            interval = %interval,
            points = series.points.len(),
            exchange = %series.exchange,
            "Series refreshed from provider"
        );
        Ok(series)
    }

    /// Refresh every exchange's session record from the provider.
    #[instrument(skip(self))]
    pub async fn refresh_market_sessions(&self) -> Result<Vec<MarketSession>> {
        let rows = self.client.fetch_market_state().await?;
        let sessions = normalize::to_market_sessions(&rows, Utc::now())?;

        for session in &sessions {
            self.store.put_session(session.clone()).await;
        }

        info!(count = sessions.len(), "Market sessions refreshed");
        Ok(sessions)
    }

    /// Symbols available under the given provider plan, grouped by
    /// exchange.
    pub async fn available_symbols(&self, plan: &str) -> Result<BTreeMap<String, Vec<String>>> {
        self.client.fetch_available_symbols(plan).await
    }
}
