//! Chart payload formatting
//!
//! Maps a price series into the `[epoch_ms, value]` pairs the frontend's
//! line chart consumes. Performance mode rebases the series to
//! percent-of-first-value.

use crate::models::PriceSeries;
use crate::utils::round2;

/// Format a series for the chart. Absent or empty input yields an empty
/// vector, never an error. Naive exchange-local timestamps are read as UTC
/// for the epoch conversion.
pub fn to_chart_points(series: Option<&PriceSeries>, performance: bool) -> Vec<(i64, f64)> {
    let series = match series {
        Some(series) => series,
        None => return Vec::new(),
    };

    let first = match series.points.first() {
        Some(point) => point.close,
        None => return Vec::new(),
    };

    series
        .points
        .iter()
        .map(|point| {
            let value = if performance {
                point.close / first * 100.0
            } else {
                point.close
            };
            (point.at.and_utc().timestamp_millis(), round2(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, PricePoint};
    use chrono::DateTime;

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                at: DateTime::from_timestamp(i as i64 * 86_400, 0)
                    .unwrap()
                    .naive_utc(),
                close,
            })
            .collect();

        PriceSeries {
            symbol: "AAPL".to_string(),
            exchange: "NASDAQ".to_string(),
            timezone: "America/New_York".to_string(),
            interval: Interval::Day1,
            points,
            market_checked: false,
        }
    }

    #[test]
    fn test_raw_mode_keeps_cardinality_and_rounds() {
        let s = series(&[3.14159, 1.005, 2.0]);
        let chart = to_chart_points(Some(&s), false);

        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0], (0, 3.14));
        assert_eq!(chart[1], (86_400_000, 1.01));
        assert_eq!(chart[2], (172_800_000, 2.0));
    }

    #[test]
    fn test_performance_mode_starts_at_100() {
        let s = series(&[3.0, 1.0, 2.0]);
        let chart = to_chart_points(Some(&s), true);

        assert_eq!(chart[0].1, 100.0);
        assert_eq!(chart[1].1, 33.33);
        assert_eq!(chart[2].1, 66.67);
    }

    #[test]
    fn test_absent_input_yields_empty() {
        assert!(to_chart_points(None, true).is_empty());
        assert!(to_chart_points(Some(&series(&[])), false).is_empty());
    }
}
