// Price simulation and synthetic history
pub mod market;

// Signed-in account and its persistence
pub mod session;

// Trade validation and atomic commits
pub mod ledger;
pub mod portfolio_valuation_service;

// View boundary
pub mod trading_desk;
