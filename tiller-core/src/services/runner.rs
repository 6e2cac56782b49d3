//! Migration runner - applies and reverts schema migrations
//!
//! Holds the advisory lock for the duration of each call, re-reads the
//! ledger fresh on every invocation, and runs each migration's body and its
//! ledger write inside one transaction so a failure leaves neither a
//! partial schema change nor a ledger entry.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::adapters::duckdb::{self, DuckDbTarget};
use crate::domain::migration::{validate_registry, MigrationRecord, Revert};
use crate::domain::{Error, LedgerEntry, Result};
use crate::services::lock::{LockMode, RunnerLock};
use crate::services::logging::{LogEvent, LoggingService};

/// Result of running pending migrations
#[derive(Debug, Serialize)]
pub struct RunOutcome {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of registry migrations that were already applied
    pub already_applied: usize,
}

/// Result of reverting applied migrations
#[derive(Debug, Serialize)]
pub struct RevertOutcome {
    /// Names of reverted migrations, newest first
    pub reverted: Vec<String>,
    /// Notes from append-only migrations whose revert had no structural effect
    pub warnings: Vec<String>,
}

/// Applies an ordered registry of migrations to a schema target.
pub struct MigrationRunner {
    target: Arc<DuckDbTarget>,
    registry: &'static [MigrationRecord],
    lock_path: PathBuf,
    lock_mode: LockMode,
    logger: Option<Arc<LoggingService>>,
}

impl MigrationRunner {
    pub fn new(
        target: Arc<DuckDbTarget>,
        registry: &'static [MigrationRecord],
        lock_path: PathBuf,
        lock_mode: LockMode,
    ) -> Self {
        Self {
            target,
            registry,
            lock_path,
            lock_mode,
            logger: None,
        }
    }

    /// Attach an event logger. Logging failures never abort a run.
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Apply all pending migrations in ascending name order.
    ///
    /// Each migration's `up` and its ledger entry commit in one transaction.
    /// The first failure rolls that transaction back and aborts the whole
    /// call - a later migration may depend on the failed one.
    pub fn run_pending(&self) -> Result<RunOutcome> {
        let _lock = RunnerLock::acquire(&self.lock_path, self.lock_mode)?;
        validate_registry(self.registry)?;

        let run_id = Uuid::new_v4().to_string();
        self.target.with_connection(duckdb::ensure_ledger)?;

        let applied: HashSet<String> = self
            .target
            .with_connection(duckdb::read_ledger)?
            .into_iter()
            .map(|entry| entry.name)
            .collect();

        let pending: Vec<&MigrationRecord> = self
            .registry
            .iter()
            .filter(|record| !applied.contains(record.name))
            .collect();

        // A known migration applied ahead of an unapplied predecessor means
        // the registry and the database history disagree.
        if let Some(first_pending) = pending.first() {
            if let Some(ahead) = self
                .registry
                .iter()
                .filter(|record| applied.contains(record.name))
                .find(|record| record.name > first_pending.name)
            {
                return Err(Error::ordering(format!(
                    "'{}' is applied but earlier migration '{}' is not",
                    ahead.name, first_pending.name
                )));
            }
        }

        let already_applied = self.registry.len() - pending.len();
        let mut newly_applied = Vec::new();

        for record in pending {
            let result = self.target.with_transaction(|conn| {
                (record.up)(conn)?;
                duckdb::record_applied(conn, record.name)
            });

            match result {
                Ok(()) => {
                    self.log(
                        LogEvent::new("migration_applied")
                            .with_migration(record.name)
                            .with_run_id(run_id.clone()),
                    );
                    newly_applied.push(record.name.to_string());
                }
                Err(e) => {
                    let err = Error::apply(record.name, &e);
                    self.log(
                        LogEvent::new("migration_failed")
                            .with_migration(record.name)
                            .with_run_id(run_id.clone())
                            .with_error(e.to_string()),
                    );
                    return Err(err);
                }
            }
        }

        Ok(RunOutcome {
            applied: newly_applied,
            already_applied,
        })
    }

    /// Revert the last `n` applied migrations, newest first, each in its
    /// own transaction.
    ///
    /// Stops fatally on the first record tagged `Irreversible`; reverts
    /// already performed in the batch stand.
    pub fn revert_last(&self, n: usize) -> Result<RevertOutcome> {
        let _lock = RunnerLock::acquire(&self.lock_path, self.lock_mode)?;
        validate_registry(self.registry)?;

        let run_id = Uuid::new_v4().to_string();

        if !self.target.with_connection(duckdb::ledger_exists)? {
            return Ok(RevertOutcome {
                reverted: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let entries = self.target.with_connection(duckdb::read_ledger)?;
        let batch: Vec<LedgerEntry> = entries.into_iter().rev().take(n).collect();

        let mut reverted = Vec::new();
        let mut warnings = Vec::new();

        for entry in batch {
            let record = self
                .registry
                .iter()
                .find(|record| record.name == entry.name)
                .ok_or_else(|| {
                    Error::ordering(format!(
                        "ledger entry '{}' has no matching migration record",
                        entry.name
                    ))
                })?;

            match record.down {
                Revert::Irreversible(reason) => {
                    self.log(
                        LogEvent::new("revert_blocked")
                            .with_migration(record.name)
                            .with_run_id(run_id.clone())
                            .with_error(reason),
                    );
                    return Err(Error::Irreversible {
                        name: record.name.to_string(),
                        reason: reason.to_string(),
                    });
                }
                Revert::Reversible(down) => {
                    self.target
                        .with_transaction(|conn| {
                            down(conn)?;
                            duckdb::remove_entry(conn, record.name)
                        })
                        .map_err(|e| {
                            self.log(
                                LogEvent::new("revert_failed")
                                    .with_migration(record.name)
                                    .with_run_id(run_id.clone())
                                    .with_error(e.to_string()),
                            );
                            Error::apply(record.name, &e)
                        })?;
                    self.log(
                        LogEvent::new("revert_applied")
                            .with_migration(record.name)
                            .with_run_id(run_id.clone()),
                    );
                    reverted.push(record.name.to_string());
                }
                Revert::AppendOnly(note) => {
                    self.target
                        .with_transaction(|conn| duckdb::remove_entry(conn, record.name))?;
                    self.log(
                        LogEvent::new("revert_noop")
                            .with_migration(record.name)
                            .with_run_id(run_id.clone())
                            .with_error_details(note),
                    );
                    warnings.push(format!("{}: {}", record.name, note));
                    reverted.push(record.name.to_string());
                }
            }
        }

        Ok(RevertOutcome { reverted, warnings })
    }

    /// Names of registry migrations not yet recorded in the ledger.
    pub fn pending(&self) -> Result<Vec<String>> {
        let applied: HashSet<String> = self
            .applied_entries()?
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        Ok(self
            .registry
            .iter()
            .filter(|record| !applied.contains(record.name))
            .map(|record| record.name.to_string())
            .collect())
    }

    /// The full ledger, oldest entry first. Empty if the ledger table has
    /// not been bootstrapped yet.
    pub fn applied_entries(&self) -> Result<Vec<LedgerEntry>> {
        if !self.target.with_connection(duckdb::ledger_exists)? {
            return Ok(Vec::new());
        }
        self.target.with_connection(duckdb::read_ledger)
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::duckdb::Connection;
    use tempfile::{tempdir, TempDir};

    fn create_alpha(conn: &Connection) -> Result<()> {
        conn.execute_batch("CREATE TABLE alpha (id INTEGER)")?;
        Ok(())
    }

    fn drop_alpha(conn: &Connection) -> Result<()> {
        conn.execute_batch("DROP TABLE alpha")?;
        Ok(())
    }

    fn create_beta(conn: &Connection) -> Result<()> {
        conn.execute_batch("CREATE TABLE beta (id INTEGER)")?;
        Ok(())
    }

    fn drop_beta(conn: &Connection) -> Result<()> {
        conn.execute_batch("DROP TABLE beta")?;
        Ok(())
    }

    const REGISTRY: &[MigrationRecord] = &[
        MigrationRecord {
            name: "1705600800000-CreateAlpha",
            up: create_alpha,
            down: Revert::Reversible(drop_alpha),
        },
        MigrationRecord {
            name: "1705600900000-CreateBeta",
            up: create_beta,
            down: Revert::Reversible(drop_beta),
        },
    ];

    fn runner(dir: &TempDir) -> MigrationRunner {
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        MigrationRunner::new(
            target,
            REGISTRY,
            dir.path().join("tiller.lock"),
            LockMode::Wait,
        )
    }

    #[test]
    fn test_run_pending_applies_all_then_nothing() {
        let dir = tempdir().unwrap();
        let runner = runner(&dir);

        let outcome = runner.run_pending().unwrap();
        assert_eq!(outcome.applied.len(), REGISTRY.len());
        assert_eq!(outcome.already_applied, 0);

        let outcome2 = runner.run_pending().unwrap();
        assert!(outcome2.applied.is_empty());
        assert_eq!(outcome2.already_applied, REGISTRY.len());
    }

    #[test]
    fn test_pending_shrinks_as_migrations_apply() {
        let dir = tempdir().unwrap();
        let runner = runner(&dir);

        assert_eq!(runner.pending().unwrap().len(), REGISTRY.len());
        runner.run_pending().unwrap();
        assert!(runner.pending().unwrap().is_empty());
    }

    #[test]
    fn test_revert_last_walks_backwards() {
        let dir = tempdir().unwrap();
        let runner = runner(&dir);
        runner.run_pending().unwrap();

        let outcome = runner.revert_last(1).unwrap();
        assert_eq!(outcome.reverted, vec!["1705600900000-CreateBeta"]);
        assert_eq!(runner.pending().unwrap(), vec!["1705600900000-CreateBeta"]);
    }

    #[test]
    fn test_revert_on_fresh_target_is_a_noop() {
        let dir = tempdir().unwrap();
        let runner = runner(&dir);

        let outcome = runner.revert_last(3).unwrap();
        assert!(outcome.reverted.is_empty());
    }

    fn purge_rows(conn: &Connection) -> Result<()> {
        conn.execute_batch("CREATE TABLE purged (id INTEGER)")?;
        Ok(())
    }

    const ONE_WAY_REGISTRY: &[MigrationRecord] = &[
        MigrationRecord {
            name: "1705600800000-CreateAlpha",
            up: create_alpha,
            down: Revert::Reversible(drop_alpha),
        },
        MigrationRecord {
            name: "1705600900000-PurgeOrphans",
            up: purge_rows,
            down: Revert::Irreversible("orphaned rows were permanently deleted"),
        },
    ];

    #[test]
    fn test_revert_last_one_on_irreversible_leaves_ledger_unchanged() {
        let dir = tempdir().unwrap();
        let target = Arc::new(DuckDbTarget::open_in_memory().unwrap());
        let runner = MigrationRunner::new(
            target,
            ONE_WAY_REGISTRY,
            dir.path().join("tiller.lock"),
            LockMode::Wait,
        );
        runner.run_pending().unwrap();

        let err = runner.revert_last(1).unwrap_err();
        match err {
            Error::Irreversible { name, reason } => {
                assert_eq!(name, "1705600900000-PurgeOrphans");
                assert!(reason.contains("permanently deleted"));
            }
            other => panic!("expected Irreversible error, got {other}"),
        }
        assert_eq!(runner.applied_entries().unwrap().len(), 2);
    }
}
