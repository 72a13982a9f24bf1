use serde::{Serialize, Serializer};

/// A statistic that may not be computable for a given series.
///
/// Serializes as a plain number, or as the string "unavailable" when the
/// series is too short or too narrow for the computation. NaN never
/// reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Value(f64),
    Unavailable,
}

impl Serialize for StatValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            StatValue::Value(v) => serializer.serialize_f64(*v),
            StatValue::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

/// Derived statistics for one symbol. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    pub symbol: String,
    #[serde(rename = "cumulativeReturn")]
    pub cumulative_return: StatValue,
    #[serde(rename = "annualizedCumulativeReturn")]
    pub annualized_cumulative_return: StatValue,
    #[serde(rename = "annualizedVolatility")]
    pub annualized_volatility: StatValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_value_wire_format() {
        let stats = StatsResult {
            symbol: "AAPL".to_string(),
            cumulative_return: StatValue::Value(-40.0),
            annualized_cumulative_return: StatValue::Value(200.0),
            annualized_volatility: StatValue::Unavailable,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["cumulativeReturn"], -40.0);
        assert_eq!(json["annualizedCumulativeReturn"], 200.0);
        assert_eq!(json["annualizedVolatility"], "unavailable");
    }
}
