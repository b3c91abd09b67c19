// Signed-in account and credential rules
pub mod account;

// Domain-specific error types
pub mod errors;

// Simulated market reference data
pub mod market;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Core trading domain
pub mod trading;
