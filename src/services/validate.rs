//! Upstream payload shape validation
//!
//! Every provider response passes through here before anything else in the
//! system touches it. A payload that drifts from the documented shape is
//! rejected as a whole with a `DataShape` error.

use crate::constants::{MARKET_STATE_KEYS, TIMESERIES_META_KEYS, TIMESERIES_VALUES_KEYS};
use crate::error::{AppError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Time-series metadata, shape-checked against the expected key set.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesMeta {
    pub symbol: String,
    pub interval: String,
    pub currency: String,
    pub exchange: String,
    pub exchange_timezone: String,
    pub mic_code: String,
    #[serde(rename = "type")]
    pub instrument_type: String,
}

/// A validated time-series payload: typed meta plus raw value rows whose
/// key sets have been verified.
#[derive(Debug, Clone)]
pub struct TimeSeriesPayload {
    pub meta: TimeSeriesMeta,
    pub values: Vec<Map<String, Value>>,
}

/// One validated market-state row, still in upstream naming. The payload
/// also carries `code` and `time_after_open`; those columns are dropped
/// here because nothing downstream consumes them.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketStateRow {
    pub name: String,
    pub country: String,
    pub is_market_open: bool,
    pub time_to_open: String,
    pub time_to_close: String,
}

/// One row of the symbol-listing payload. The provider sends more columns;
/// only the ones this system groups on are required.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolRow {
    pub symbol: String,
    pub exchange: String,
    pub access: Option<SymbolAccess>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolAccess {
    pub plan: String,
}

fn key_set(map: &Map<String, Value>) -> BTreeSet<&str> {
    map.keys().map(String::as_str).collect()
}

fn expected_set(keys: &[&'static str]) -> BTreeSet<&'static str> {
    keys.iter().copied().collect()
}

fn status_is_ok(payload: &Value) -> bool {
    payload.get("status").and_then(Value::as_str) == Some("ok")
}

/// Validate a time-series payload: status field, exact meta key set, rows
/// that are all objects sharing the expected key set, non-empty row list.
pub fn check_time_series(payload: &Value) -> Result<TimeSeriesPayload> {
    if !status_is_ok(payload) {
        return Err(AppError::DataShape(
            "Response status is not ok, check Twelve Data API".to_string(),
        ));
    }

    let meta_value = payload
        .get("meta")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::DataShape("Meta data are not correct, check Twelve Data API".to_string())
        })?;

    if key_set(meta_value) != expected_set(TIMESERIES_META_KEYS) {
        return Err(AppError::DataShape(
            "Meta data are not correct, check Twelve Data API".to_string(),
        ));
    }

    let meta: TimeSeriesMeta =
        serde_json::from_value(Value::Object(meta_value.clone())).map_err(|_| {
            AppError::DataShape("Meta data are not correct, check Twelve Data API".to_string())
        })?;

    let rows = payload
        .get("values")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::DataShape("Data values are not a list, check Twelve Data API".to_string())
        })?;

    if rows.is_empty() {
        return Err(AppError::DataShape(
            "Data value is empty, check Twelve Data API".to_string(),
        ));
    }

    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        let object = row.as_object().ok_or_else(|| {
            AppError::DataShape(
                "Data values are not a list of objects, check Twelve Data API".to_string(),
            )
        })?;
        values.push(object.clone());
    }

    let first_keys = key_set(&values[0]);
    if values.iter().any(|row| key_set(row) != first_keys) {
        return Err(AppError::DataShape(
            "Data value keys are not always the same, check Twelve Data API".to_string(),
        ));
    }

    if first_keys != expected_set(TIMESERIES_VALUES_KEYS) {
        return Err(AppError::DataShape(
            "Data value keys are not the expected ones, check Twelve Data API".to_string(),
        ));
    }

    Ok(TimeSeriesPayload { meta, values })
}

/// Validate a market-state payload: non-empty row list, rows all objects
/// sharing the exact expected key set.
pub fn check_market_state(payload: &Value) -> Result<Vec<MarketStateRow>> {
    if !status_is_ok(payload) {
        return Err(AppError::DataShape(
            "Response status is not ok, check Twelve Data API".to_string(),
        ));
    }

    let rows = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::DataShape("Data values are not a list, check Twelve Data API".to_string())
        })?;

    if rows.is_empty() {
        return Err(AppError::DataShape(
            "No data retrieved, check Twelve Data API".to_string(),
        ));
    }

    let mut objects = Vec::with_capacity(rows.len());
    for row in rows {
        let object = row.as_object().ok_or_else(|| {
            AppError::DataShape(
                "Data values are not a list of objects, check Twelve Data API".to_string(),
            )
        })?;
        objects.push(object);
    }

    let first_keys = key_set(objects[0]);
    if objects.iter().any(|row| key_set(row) != first_keys) {
        return Err(AppError::DataShape(
            "Data value keys are not always the same, check Twelve Data API".to_string(),
        ));
    }

    if first_keys != expected_set(MARKET_STATE_KEYS) {
        return Err(AppError::DataShape(
            "Data value keys are not the expected ones, check Twelve Data API".to_string(),
        ));
    }

    objects
        .into_iter()
        .map(|object| {
            serde_json::from_value(Value::Object(object.clone())).map_err(|_| {
                AppError::DataShape(
                    "Data values are not in the expected format, check Twelve Data API"
                        .to_string(),
                )
            })
        })
        .collect()
}

/// Validate a symbol-listing payload: a list of objects each carrying at
/// least a symbol and an exchange.
pub fn check_symbol_listing(payload: &Value) -> Result<Vec<SymbolRow>> {
    let rows = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AppError::DataShape("Data values are not a list, check Twelve Data API".to_string())
        })?;

    rows.iter()
        .map(|row| {
            serde_json::from_value(row.clone()).map_err(|_| {
                AppError::DataShape(
                    "Symbol rows are not in the expected format, check Twelve Data API"
                        .to_string(),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> Value {
        json!({
            "symbol": "AAPL",
            "interval": "1day",
            "currency": "USD",
            "exchange": "NASDAQ",
            "exchange_timezone": "America/New_York",
            "mic_code": "XNAS",
            "type": "Common Stock",
        })
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

    fn shape_message(err: AppError) -> String {
        match err {
            AppError::DataShape(message) => message,
            other => panic!("expected DataShape, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_well_formed_payload() {
        let payload = json!({
            "status": "ok",
            "meta": meta(),
            "values": [row("2024-01-02", "185.64"), row("2024-01-03", "184.25")],
        });

        let validated = check_time_series(&payload).unwrap();
        assert_eq!(validated.meta.exchange, "NASDAQ");
        assert_eq!(validated.meta.exchange_timezone, "America/New_York");
        assert_eq!(validated.values.len(), 2);
    }

    #[test]
    fn test_rejects_wrong_meta_keys() {
        let mut bad_meta = meta();
        bad_meta.as_object_mut().unwrap().remove("currency");
        bad_meta
            .as_object_mut()
            .unwrap()
            .insert("currency_base".to_string(), json!("USD"));

        let payload = json!({
            "status": "ok",
            "meta": bad_meta,
            "values": [row("2024-01-02", "185.64")],
        });

        let message = shape_message(check_time_series(&payload).unwrap_err());
        assert_eq!(message, "Meta data are not correct, check Twelve Data API");
    }

    #[test]
    fn test_rejects_empty_values() {
        let payload = json!({ "status": "ok", "meta": meta(), "values": [] });
        let message = shape_message(check_time_series(&payload).unwrap_err());
        assert_eq!(message, "Data value is empty, check Twelve Data API");
    }

    #[test]
    fn test_rejects_non_object_rows() {
        let payload = json!({ "status": "ok", "meta": meta(), "values": [[1, 2, 3]] });
        let message = shape_message(check_time_series(&payload).unwrap_err());
        assert_eq!(
            message,
            "Data values are not a list of objects, check Twelve Data API"
        );
    }

    #[test]
    fn test_rejects_inconsistent_row_keys() {
        let mut short_row = row("2024-01-03", "184.25");
        short_row.as_object_mut().unwrap().remove("volume");

        let payload = json!({
            "status": "ok",
            "meta": meta(),
            "values": [row("2024-01-02", "185.64"), short_row],
        });

        let message = shape_message(check_time_series(&payload).unwrap_err());
        assert_eq!(
            message,
            "Data value keys are not always the same, check Twelve Data API"
        );
    }

    #[test]
    fn test_rejects_unexpected_row_keys() {
        let payload = json!({
            "status": "ok",
            "meta": meta(),
            "values": [
                { "datetime": "2024-01-02", "open": "1", "high": "1", "low": "1", "last": "1", "volume": "1" },
            ],
        });

        let message = shape_message(check_time_series(&payload).unwrap_err());
        assert_eq!(
            message,
            "Data value keys are not the expected ones, check Twelve Data API"
        );
    }

    #[test]
    fn test_market_state_rows_round_trip() {
        let payload = json!({
            "status": "ok",
            "data": [
                {
                    "name": "NASDAQ",
                    "code": "XNAS",
                    "country": "United States",
                    "is_market_open": true,
                    "time_to_open": "00:00:00",
                    "time_to_close": "02:56:09",
                    "time_after_open": "03:33:51",
                },
            ],
        });

        let rows = check_market_state(&payload).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "NASDAQ");
        assert!(rows[0].is_market_open);
    }

    #[test]
    fn test_market_state_rejects_empty_data() {
        let payload = json!({ "status": "ok", "data": [] });
        let message = shape_message(check_market_state(&payload).unwrap_err());
        assert_eq!(message, "No data retrieved, check Twelve Data API");
    }
}
