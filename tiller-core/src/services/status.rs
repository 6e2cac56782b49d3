//! Status service - ledger summary for the operator surface

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::adapters::duckdb::{self, DuckDbTarget};
use crate::domain::MigrationRecord;
use crate::domain::Result;

/// Service summarizing what the ledger says about this target
pub struct StatusService {
    target: Arc<DuckDbTarget>,
    registry: &'static [MigrationRecord],
}

/// Snapshot of applied and pending migrations
#[derive(Debug, Serialize)]
pub struct LedgerStatus {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<String>,
    /// Ledger entries with no matching record in the registry
    pub unknown_entries: Vec<String>,
    pub total_known: usize,
}

#[derive(Debug, Serialize)]
pub struct AppliedMigration {
    pub name: String,
    pub applied_at: String,
    /// How this migration reverts: "yes", "append-only", or "one-way"
    pub revert: &'static str,
}

impl StatusService {
    pub fn new(target: Arc<DuckDbTarget>, registry: &'static [MigrationRecord]) -> Self {
        Self { target, registry }
    }

    /// Build the current ledger status. Works on a fresh target where the
    /// ledger table does not exist yet - everything is pending then.
    pub fn get_status(&self) -> Result<LedgerStatus> {
        let entries = self.target.with_connection(|conn| {
            if !duckdb::ledger_exists(conn)? {
                return Ok(Vec::new());
            }
            duckdb::read_ledger(conn)
        })?;

        let known: HashSet<&str> = self.registry.iter().map(|record| record.name).collect();
        let applied_names: HashSet<String> =
            entries.iter().map(|entry| entry.name.clone()).collect();

        let applied = entries
            .iter()
            .filter_map(|entry| {
                self.registry
                    .iter()
                    .find(|record| record.name == entry.name)
                    .map(|record| AppliedMigration {
                        name: entry.name.clone(),
                        applied_at: entry.applied_at.to_rfc3339(),
                        revert: record.revert_label(),
                    })
            })
            .collect();

        let unknown_entries = entries
            .iter()
            .filter(|entry| !known.contains(entry.name.as_str()))
            .map(|entry| entry.name.clone())
            .collect();

        let pending = self
            .registry
            .iter()
            .filter(|record| !applied_names.contains(record.name))
            .map(|record| record.name.to_string())
            .collect();

        Ok(LedgerStatus {
            applied,
            pending,
            unknown_entries,
            total_known: self.registry.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::STORE_MIGRATIONS;

    #[test]
    fn test_fresh_target_reports_everything_pending() {
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        let service = StatusService::new(target, STORE_MIGRATIONS);

        let status = service.get_status().unwrap();
        assert!(status.applied.is_empty());
        assert_eq!(status.pending.len(), STORE_MIGRATIONS.len());
        assert!(status.unknown_entries.is_empty());
    }

    #[test]
    fn test_unknown_ledger_entries_are_reported() {
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        target
            .with_connection(|conn| {
                duckdb::ensure_ledger(conn)?;
                duckdb::record_applied(conn, "1600000000000-FromAnotherBranch")
            })
            .unwrap();

        let service = StatusService::new(target, STORE_MIGRATIONS);
        let status = service.get_status().unwrap();
        assert_eq!(
            status.unknown_entries,
            vec!["1600000000000-FromAnotherBranch"]
        );
        assert!(status.applied.is_empty());
    }
}
