use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Open/closed state of one exchange, overwritten in place on each check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSession {
    pub exchange: String,
    pub country: String,
    #[serde(rename = "isMarketOpen")]
    pub is_market_open: bool,
    #[serde(rename = "timeToOpen", with = "duration_secs")]
    pub time_to_open: Duration,
    #[serde(rename = "timeToClose", with = "duration_secs")]
    pub time_to_close: Duration,
    #[serde(rename = "checkedAt")]
    pub checked_at: DateTime<Utc>,
}

/// Durations cross the wire as whole seconds.
mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(secs))
    }
}
