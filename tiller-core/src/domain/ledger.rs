//! Ledger entries - the persisted record of applied migrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `sys_migrations` ledger table.
///
/// The ledger is append-only: an entry is only ever removed by an explicit
/// operator-invoked revert that also executed the migration's `down`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}
