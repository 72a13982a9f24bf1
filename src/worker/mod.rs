mod market_worker;

pub use market_worker::run_market_worker;
