//! Concrete adapters for external resources

pub mod duckdb;
