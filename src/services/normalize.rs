//! Normalization of validated upstream payloads into canonical records.

use crate::error::{AppError, Result};
use crate::models::{Interval, MarketSession, PricePoint, PriceSeries};
use crate::services::validate::{MarketStateRow, TimeSeriesPayload};
use crate::utils::{parse_point_datetime, parse_state_duration};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Build a canonical `PriceSeries` from a validated payload.
///
/// The `close` field is coerced to f64, timestamps are parsed and sorted
/// ascending, and duplicate timestamps keep the later row. Exchange and
/// timezone come verbatim from meta.
pub fn to_price_series(payload: &TimeSeriesPayload, interval: Interval) -> Result<PriceSeries> {
    let mut points = Vec::with_capacity(payload.values.len());

    for row in &payload.values {
        let datetime = field_str(row.get("datetime"))?;
        let close = field_str(row.get("close"))?;

        let at = parse_point_datetime(datetime)?;
        let close = close
            .parse::<f64>()
            .map_err(|_| AppError::DataShape(format!("Invalid close value: {}", close)))?;

        points.push(PricePoint { at, close });
    }

    points.sort_by_key(|p| p.at);

    // Duplicate timestamps: keep the later row of the sorted run.
    let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last_mut() {
            Some(last) if last.at == point.at => *last = point,
            _ => deduped.push(point),
        }
    }

    Ok(PriceSeries {
        symbol: payload.meta.symbol.clone(),
        exchange: payload.meta.exchange.clone(),
        timezone: payload.meta.exchange_timezone.clone(),
        interval,
        points: deduped,
        market_checked: false,
    })
}

fn field_str(value: Option<&Value>) -> Result<&str> {
    value.and_then(Value::as_str).ok_or_else(|| {
        AppError::DataShape(
            "Data values are not in the expected format, check Twelve Data API".to_string(),
        )
    })
}

/// Convert market-state rows into `MarketSession` records. The upstream
/// `name` becomes the exchange key; duplicate exchanges keep the first row.
pub fn to_market_sessions(
    rows: &[MarketStateRow],
    checked_at: DateTime<Utc>,
) -> Result<Vec<MarketSession>> {
    let mut sessions: Vec<MarketSession> = Vec::with_capacity(rows.len());

    for row in rows {
        if sessions.iter().any(|s| s.exchange == row.name) {
            continue;
        }

        sessions.push(MarketSession {
            exchange: row.name.clone(),
            country: row.country.clone(),
            is_market_open: row.is_market_open,
            time_to_open: parse_state_duration(&row.time_to_open)?,
            time_to_close: parse_state_duration(&row.time_to_close)?,
            checked_at,
        });
    }

    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::validate::check_time_series;
    use serde_json::json;

    fn payload_with_rows(rows: Vec<Value>) -> TimeSeriesPayload {
        let payload = json!({
            "status": "ok",
            "meta": {
                "symbol": "AAPL",
                "interval": "1day",
                "currency": "USD",
                "exchange": "NASDAQ",
                "exchange_timezone": "America/New_York",
                "mic_code": "XNAS",
                "type": "Common Stock",
            },
            "values": rows,
        });
        check_time_series(&payload).unwrap()
    }

    fn row(datetime: &str, close: &str) -> Value {
        json!({
            "datetime": datetime,
            "open": "1.0",
            "high": "1.0",
            "low": "1.0",
            "close": close,
            "volume": "100",
        })
    }

    #[test]
    fn test_rows_are_sorted_ascending() {
        // Provider reports newest-first.
        let payload = payload_with_rows(vec![
            row("2024-01-04", "186.19"),
            row("2024-01-03", "184.25"),
            row("2024-01-02", "185.64"),
        ]);

        let series = to_price_series(&payload, Interval::Day1).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.exchange, "NASDAQ");
        assert_eq!(series.timezone, "America/New_York");
        assert!(!series.market_checked);

        let dates: Vec<String> = series
            .points
            .iter()
            .map(|p| p.at.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn test_duplicate_timestamps_keep_last() {
        let payload = payload_with_rows(vec![
            row("2024-01-02", "185.64"),
            row("2024-01-02", "185.70"),
            row("2024-01-03", "184.25"),
        ]);

        let series = to_price_series(&payload, Interval::Day1).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].close, 185.70);
    }

    #[test]
    fn test_unparseable_close_is_a_shape_error() {
        let payload = payload_with_rows(vec![row("2024-01-02", "n/a")]);
        let err = to_price_series(&payload, Interval::Day1).unwrap_err();
        assert!(matches!(err, AppError::DataShape(_)));
    }

    #[test]
    fn test_market_sessions_drop_duplicate_exchanges() {
        let mk = |name: &str, open: bool| MarketStateRow {
            name: name.to_string(),
            country: "United States".to_string(),
            is_market_open: open,
            time_to_open: "00:00:00".to_string(),
            time_to_close: "02:56:09".to_string(),
        };

        let now = Utc::now();
        let sessions =
            to_market_sessions(&[mk("NYSE", true), mk("NYSE", false), mk("NASDAQ", true)], now)
                .unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].exchange, "NYSE");
        // First row wins.
        assert!(sessions[0].is_market_open);
        assert_eq!(sessions[0].checked_at, now);
    }
}
