pub mod persistence;
pub mod repositories;
pub mod simulated_market;
pub mod trade_export;

pub use persistence::JsonFileStore;
pub use repositories::InMemoryStateStore;
pub use simulated_market::SimulatedMarketDataService;
