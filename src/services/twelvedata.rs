//! Twelve Data API client
//!
//! Thin gate between the provider and the rest of the system. Every
//! response is shape-checked by `validate` before it is returned, so the
//! caller only ever sees typed results or an `AppError`.

use crate::config::AppConfig;
use crate::constants::TIMESERIES_OUTPUT_SIZE;
use crate::error::{AppError, Result};
use crate::models::Interval;
use crate::services::validate::{
    self, MarketStateRow, SymbolRow, TimeSeriesPayload,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone)]
pub struct TwelveDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch the time series for one symbol at one interval.
    pub async fn fetch_time_series(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> Result<TimeSeriesPayload> {
        debug!(symbol, interval = %interval, "Requesting time series");

        let payload = self
            .get_json(
                "time_series",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_api_format().to_string()),
                    ("outputsize", TIMESERIES_OUTPUT_SIZE.to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        validate::check_time_series(&payload)
    }

    /// Fetch the open/closed state of every exchange the provider covers.
    pub async fn fetch_market_state(&self) -> Result<Vec<MarketStateRow>> {
        debug!("Requesting market state");
        let payload = self.get_json("market_state", &[]).await?;
        validate::check_market_state(&payload)
    }

    /// Fetch the symbols available under the given provider plan, grouped
    /// by exchange. Rows carrying an access block for a different plan are
    /// filtered out.
    pub async fn fetch_available_symbols(
        &self,
        plan: &str,
    ) -> Result<BTreeMap<String, Vec<String>>> {
        debug!(plan, "Requesting available symbols");
        let payload = self.get_json("stocks", &[]).await?;
        let rows = validate::check_symbol_listing(&payload)?;

        let mut by_exchange: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for SymbolRow {
            symbol,
            exchange,
            access,
        } in rows
        {
            if let Some(access) = access {
                if access.plan != plan {
                    continue;
                }
            }
            by_exchange.entry(exchange).or_default().push(symbol);
        }

        Ok(by_exchange)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        check_response_body(response).await
    }
}

/// Map the raw HTTP response onto the provider's result format.
///
/// 404 and other non-success statuses become upstream errors with fixed
/// codes; a JSON body with `status: "error"` becomes an upstream error
/// carrying the provider's own code and message. Array bodies (the market
/// state endpoint) are wrapped into the `{status, data}` envelope the
/// validators expect.
async fn check_response_body(response: reqwest::Response) -> Result<Value> {
    match response.status().as_u16() {
        404 => {
            return Err(AppError::Upstream {
                code: 404,
                message: "Not found".to_string(),
            })
        }
        200 => {}
        _ => {
            return Err(AppError::Upstream {
                code: 501,
                message: "Not implemented".to_string(),
            })
        }
    }

    let body = response.text().await?;
    let parsed: Value = serde_json::from_str(&body)?;

    if parsed.is_array() {
        return Ok(json!({ "status": "ok", "data": parsed }));
    }

    if parsed.get("status").and_then(Value::as_str) == Some("error") {
        let code = parsed
            .get("code")
            .and_then(Value::as_u64)
            .unwrap_or(500) as u16;
        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown upstream error")
            .to_string();
        return Err(AppError::Upstream { code, message });
    }

    Ok(parsed)
}
