//! Freshness policy
//!
//! Decides, for one cached series, whether it can be served as-is, must be
//! refreshed from the provider, or should be withheld. The decision is
//! pure; flag mutations and network calls are applied by the orchestrator.

use crate::models::{MarketSession, PriceSeries};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Outcome of assessing one cached series against the wall clock and its
/// exchange's session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Last sample is younger than the interval: serve cached data.
    Fresh,
    /// Stale while the exchange trades: refetch unconditionally.
    StaleMarketOpen,
    /// Stale, exchange closed, not yet checked this closure: refetch once.
    StaleMarketClosedUnverified,
    /// Stale, exchange closed, already checked: withhold, no network call.
    StaleMarketClosedVerified,
    /// Stale but the exchange has no session record to consult.
    NoMarketData,
}

/// Assess a cached series. `now` is injected so the decision table is
/// directly testable.
///
/// Age is measured on the exchange's wall clock: stored timestamps are
/// exchange-local naive datetimes, so `now` is localized to the series'
/// timezone before subtracting.
pub fn assess(
    series: &PriceSeries,
    session: Option<&MarketSession>,
    now: DateTime<Utc>,
) -> Freshness {
    let tz: Tz = match series.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(
                symbol = %series.symbol,
                timezone = %series.timezone,
                "Unknown exchange timezone, falling back to UTC"
            );
            chrono_tz::UTC
        }
    };

    if let Some(last_at) = series.last_at() {
        let now_local = now.with_timezone(&tz).naive_local();
        let age = now_local - last_at;
        if age < series.interval.duration() {
            return Freshness::Fresh;
        }
    }

    match session {
        None => Freshness::NoMarketData,
        Some(session) if session.is_market_open => Freshness::StaleMarketOpen,
        Some(_) if !series.market_checked => Freshness::StaleMarketClosedUnverified,
        Some(_) => Freshness::StaleMarketClosedVerified,
    }
}
