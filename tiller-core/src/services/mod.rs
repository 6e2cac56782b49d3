//! Core services

pub mod doctor;
pub mod lock;
pub mod logging;
pub mod runner;
pub mod status;

pub use doctor::{CheckResult, DoctorResult, DoctorService};
pub use lock::{LockMode, RunnerLock};
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use runner::{MigrationRunner, RevertOutcome, RunOutcome};
pub use status::{AppliedMigration, LedgerStatus, StatusService};
