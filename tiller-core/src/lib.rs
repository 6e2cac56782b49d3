//! Tiller Core - schema evolution engine for the storefront database
//!
//! This crate implements the migration machinery the `tiller` CLI drives:
//!
//! - **domain**: migration records, ledger entries, and the error taxonomy
//! - **adapters**: DuckDB schema-target access and ledger storage
//! - **services**: runner, advisory lock, status, doctor, event logging
//! - **migrations**: the built-in storefront migration registry

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbTarget;
use config::Config;
use migrations::STORE_MIGRATIONS;
use services::{DoctorService, MigrationRunner, StatusService};

// Re-export commonly used types at crate root
pub use domain::{Error, LedgerEntry, MigrationRecord, Revert};
pub use services::{
    LockMode, LogEvent, LoggingService, RevertOutcome, RunOutcome,
};

/// Main context for Tiller operations
///
/// This is the primary entry point: it opens the storefront database and
/// wires the runner and reporting services to it.
pub struct TillerContext {
    pub config: Config,
    pub target: Arc<DuckDbTarget>,
    pub runner: MigrationRunner,
    pub status_service: StatusService,
    pub doctor_service: DoctorService,
    /// Event logger shared with the runner; None if logging failed to open
    pub logger: Option<Arc<LoggingService>>,
}

impl TillerContext {
    /// Create a new Tiller context rooted at `tiller_dir`
    pub fn new(tiller_dir: &Path) -> Result<Self> {
        let config = Config::load(tiller_dir)?;

        let db_path = tiller_dir.join(&config.database_file);
        let target = Arc::new(DuckDbTarget::open(&db_path)?);
        let lock_path = tiller_dir.join("tiller.lock");

        let runner = MigrationRunner::new(
            Arc::clone(&target),
            STORE_MIGRATIONS,
            lock_path,
            config.lock_mode,
        );
        let status_service = StatusService::new(Arc::clone(&target), STORE_MIGRATIONS);
        let doctor_service = DoctorService::new(Arc::clone(&target), STORE_MIGRATIONS);

        Ok(Self {
            config,
            target,
            runner,
            status_service,
            doctor_service,
            logger: None,
        })
    }

    /// Attach an event logger so runner activity is recorded
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.runner = self.runner.with_logger(Arc::clone(&logger));
        self.logger = Some(logger);
        self
    }
}
