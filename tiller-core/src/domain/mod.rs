//! Core domain types

pub mod ledger;
pub mod migration;
pub mod result;

pub use ledger::LedgerEntry;
pub use migration::{MigrationRecord, Revert};
pub use result::{Error, Result};
