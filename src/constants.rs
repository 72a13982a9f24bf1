//! Upstream payload shape constants
//!
//! The provider's responses are validated against these fixed key sets
//! before any row enters the store. A drifted payload is rejected as a
//! whole rather than partially ingested.

/// Keys the time-series `meta` object must carry, exactly.
pub const TIMESERIES_META_KEYS: &[&str] = &[
    "symbol",
    "interval",
    "currency",
    "exchange",
    "exchange_timezone",
    "mic_code",
    "type",
];

/// Keys every time-series value row must carry, exactly.
pub const TIMESERIES_VALUES_KEYS: &[&str] = &[
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volume",
];

/// Keys every market-state row must carry, exactly.
pub const MARKET_STATE_KEYS: &[&str] = &[
    "name",
    "code",
    "country",
    "is_market_open",
    "time_to_open",
    "time_to_close",
    "time_after_open",
];

/// Number of rows requested per time-series fetch.
pub const TIMESERIES_OUTPUT_SIZE: u32 = 5000;

/// Default HTTP port when PORT is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

/// Default origin allowed by CORS when FRONTEND_ORIGIN is not set.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
