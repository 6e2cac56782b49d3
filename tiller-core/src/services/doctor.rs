//! Doctor service - ledger and registry health checks

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::adapters::duckdb::{self, DuckDbTarget};
use crate::domain::migration::validate_registry;
use crate::domain::{MigrationRecord, Result, Revert};

/// Doctor service for health checks
pub struct DoctorService {
    target: Arc<DuckDbTarget>,
    registry: &'static [MigrationRecord],
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: HashMap<String, CheckResult>,
    pub healthy: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            status: "pass".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warning(message: impl Into<String>, details: Vec<serde_json::Value>) -> Self {
        Self {
            status: "warning".to_string(),
            message: message.into(),
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }

    fn error(message: impl Into<String>, details: Vec<serde_json::Value>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }
}

impl DoctorService {
    pub fn new(target: Arc<DuckDbTarget>, registry: &'static [MigrationRecord]) -> Self {
        Self { target, registry }
    }

    /// Run all health checks
    pub fn run_checks(&self) -> Result<DoctorResult> {
        let mut checks = HashMap::new();

        // Registry ordering must hold before anything else is meaningful
        checks.insert(
            "registry_ordering".to_string(),
            match validate_registry(self.registry) {
                Ok(()) => CheckResult::pass(format!(
                    "{} migration(s) in strict ascending order",
                    self.registry.len()
                )),
                Err(e) => CheckResult::error(e.to_string(), Vec::new()),
            },
        );

        let ledger_present = self.target.with_connection(duckdb::ledger_exists)?;
        checks.insert(
            "ledger_table".to_string(),
            if ledger_present {
                CheckResult::pass("sys_migrations table present")
            } else {
                CheckResult::warning(
                    "ledger not created yet - run 'tiller up' to bootstrap it",
                    Vec::new(),
                )
            },
        );

        if ledger_present {
            let entries = self.target.with_connection(duckdb::read_ledger)?;
            let known: HashSet<&str> = self.registry.iter().map(|record| record.name).collect();
            let applied: HashSet<&str> = entries
                .iter()
                .map(|entry| entry.name.as_str())
                .filter(|name| known.contains(name))
                .collect();

            // Entries from a newer or different registry build
            let unknown: Vec<serde_json::Value> = entries
                .iter()
                .filter(|entry| !known.contains(entry.name.as_str()))
                .map(|entry| json!({ "name": entry.name }))
                .collect();
            checks.insert(
                "unknown_ledger_entries".to_string(),
                if unknown.is_empty() {
                    CheckResult::pass("every ledger entry matches a known migration")
                } else {
                    CheckResult::warning(
                        format!(
                            "{} ledger entr(ies) have no matching migration record",
                            unknown.len()
                        ),
                        unknown,
                    )
                },
            );

            // A gap in the applied prefix means this registry cannot safely run
            let mut gaps: Vec<serde_json::Value> = Vec::new();
            let mut seen_unapplied: Option<&str> = None;
            for record in self.registry {
                if applied.contains(record.name) {
                    if let Some(unapplied) = seen_unapplied {
                        gaps.push(json!({
                            "applied": record.name,
                            "missing_predecessor": unapplied,
                        }));
                    }
                } else if seen_unapplied.is_none() {
                    seen_unapplied = Some(record.name);
                }
            }
            checks.insert(
                "applied_order".to_string(),
                if gaps.is_empty() {
                    CheckResult::pass("applied migrations form a clean prefix of the registry")
                } else {
                    CheckResult::error(
                        "applied migrations skip over unapplied predecessors",
                        gaps,
                    )
                },
            );

            // One-way migrations already applied - useful to know before
            // reaching for revert
            let one_way: Vec<serde_json::Value> = self
                .registry
                .iter()
                .filter(|record| applied.contains(record.name))
                .filter(|record| matches!(record.down, Revert::Irreversible(_)))
                .map(|record| json!({ "name": record.name }))
                .collect();
            checks.insert(
                "irreversible_applied".to_string(),
                if one_way.is_empty() {
                    CheckResult::pass("no one-way migrations applied")
                } else {
                    CheckResult {
                        status: "pass".to_string(),
                        message: format!(
                            "{} applied migration(s) cannot be reverted",
                            one_way.len()
                        ),
                        details: Some(one_way),
                    }
                },
            );
        }

        let healthy = checks
            .values()
            .all(|check| check.status != "error");

        Ok(DoctorResult { checks, healthy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::STORE_MIGRATIONS;

    #[test]
    fn test_fresh_target_is_healthy_with_warning() {
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        let doctor = DoctorService::new(target, STORE_MIGRATIONS);

        let result = doctor.run_checks().unwrap();
        assert!(result.healthy);
        assert_eq!(result.checks["ledger_table"].status, "warning");
        assert_eq!(result.checks["registry_ordering"].status, "pass");
    }

    #[test]
    fn test_gap_in_applied_prefix_is_an_error() {
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        target
            .with_connection(|conn| {
                duckdb::ensure_ledger(conn)?;
                // Mark a later migration applied while its predecessors are not
                duckdb::record_applied(conn, STORE_MIGRATIONS[2].name)
            })
            .unwrap();

        let doctor = DoctorService::new(target, STORE_MIGRATIONS);
        let result = doctor.run_checks().unwrap();
        assert!(!result.healthy);
        assert_eq!(result.checks["applied_order"].status, "error");
    }
}
