use super::Interval;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One close-price sample.
///
/// Timestamps are exchange-local naive datetimes, exactly as the provider
/// reports them. Localization only happens where a wall-clock comparison
/// is needed (freshness) or an epoch value is emitted (charting).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: NaiveDateTime,
    pub close: f64,
}

/// Canonical cached time series for one (symbol, interval) key.
///
/// Invariants when stored: points are strictly ascending by timestamp,
/// timestamps are unique, and the series is non-empty. Refreshes replace
/// the whole record; there is no partial merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub exchange: String,
    /// IANA timezone of the exchange, copied verbatim from upstream meta.
    pub timezone: String,
    pub interval: Interval,
    pub points: Vec<PricePoint>,
    /// True once a refresh was attempted while the exchange was closed,
    /// since the last successful data update. Gates repeat refetches
    /// against a closed market.
    #[serde(default)]
    pub market_checked: bool,
}

impl PriceSeries {
    /// Timestamp of the most recent sample, if any.
    pub fn last_at(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.at)
    }
}
