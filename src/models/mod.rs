mod interval;
mod market;
mod series;
mod stats;

pub use interval::Interval;
pub use market::MarketSession;
pub use series::{PricePoint, PriceSeries};
pub use stats::{StatValue, StatsResult};
