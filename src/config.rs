use crate::constants::{DEFAULT_BASE_URL, DEFAULT_FRONTEND_ORIGIN, DEFAULT_PORT};
use crate::error::{AppError, Result};

/// Runtime configuration, read once from the environment and passed down
/// as an explicit parameter. Nothing here lives in process-wide state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider API key (TWELVEDATA_API_KEY, required).
    pub api_key: String,
    /// Provider base URL (TWELVEDATA_BASE_URL).
    pub base_url: String,
    /// HTTP listen port (PORT, overridable from the CLI).
    pub port: u16,
    /// Origin allowed by CORS (FRONTEND_ORIGIN).
    pub frontend_origin: String,
    /// Market-session worker cadence in seconds while a market is open
    /// (MARKET_REFRESH_SECS).
    pub market_refresh_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TWELVEDATA_API_KEY")
            .map_err(|_| AppError::Config("TWELVEDATA_API_KEY is not set".to_string()))?;

        let base_url = std::env::var("TWELVEDATA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("Invalid PORT value: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let frontend_origin = std::env::var("FRONTEND_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());

        let market_refresh_secs = match std::env::var("MARKET_REFRESH_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config(format!("Invalid MARKET_REFRESH_SECS value: {}", raw))
            })?,
            Err(_) => 300,
        };

        Ok(Self {
            api_key,
            base_url,
            port,
            frontend_origin,
            market_refresh_secs,
        })
    }
}
