pub mod chart_generator;
pub mod price_simulator;

pub use chart_generator::ChartGenerator;
pub use price_simulator::{PriceChange, PriceSimulator};
