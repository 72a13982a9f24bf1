pub mod chart;
pub mod data_store;
pub mod data_sync;
pub mod freshness;
pub mod normalize;
pub mod stock_stats;
pub mod twelvedata;
pub mod validate;

pub use data_store::{DataStore, HealthStats, SharedDataStore, SharedHealthStats};
pub use data_sync::{DataSync, RefreshOutcome};
pub use twelvedata::TwelveDataClient;
