// Core trading domain entities and value objects
pub mod portfolio;
pub mod types;
pub mod valuation;
