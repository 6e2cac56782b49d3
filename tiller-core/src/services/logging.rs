//! Logging service - structured runner events in DuckDB
//!
//! Records what the runner did (and failed to do) in events.duckdb, kept
//! separate from the schema target so a broken migration run can still be
//! diagnosed. No schema contents or row data are ever logged.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use duckdb::Connection;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Result};
use crate::log_migrations::LOG_MIGRATIONS;

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    // Lower 48 bits for timestamp, upper 16 bits for a per-millisecond counter
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

/// Get current unix timestamp in milliseconds
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// A runner event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    /// Create a new event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            run_id: None,
            migration: None,
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Tag the event with the runner invocation it belongs to
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Set the migration this event concerns
    pub fn with_migration(mut self, migration: impl Into<String>) -> Self {
        self.migration = Some(migration.into());
        self
    }

    /// Set the CLI command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set error details (underlying cause, additional context)
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// An event as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub run_id: Option<String>,
    pub migration: Option<String>,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

/// Service for structured runner-event logging
///
/// Manages events.duckdb and provides methods for recording events and
/// querying the history.
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open or create events.duckdb in the tiller directory and run any
    /// pending log-schema migrations.
    pub fn new(tiller_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = tiller_dir.join("events.duckdb");
        let conn = Connection::open(&db_path)?;

        let service = Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
            platform: detect_platform(),
        };

        service.run_migrations()?;

        Ok(service)
    }

    /// Run any pending migrations on the events database
    fn run_migrations(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        let table_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM information_schema.tables WHERE table_name = 'sys_migrations'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !table_exists {
            if let Some((name, sql)) = LOG_MIGRATIONS
                .iter()
                .find(|(n, _)| *n == "000_migrations.sql")
            {
                conn.execute_batch(sql)?;
                conn.execute(
                    "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                    [name],
                )?;
            }
        }

        let mut stmt = conn.prepare("SELECT migration_name FROM sys_migrations")?;
        let applied: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        for (name, sql) in LOG_MIGRATIONS.iter() {
            if *name == "000_migrations.sql" {
                continue;
            }
            if !applied.contains(&name.to_string()) {
                conn.execute_batch(sql)?;
                conn.execute(
                    "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                    [name],
                )?;
            }
        }

        Ok(())
    }

    /// Record an event. App version and platform are stamped automatically.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "INSERT INTO sys_events (
                 id, timestamp, app_version, platform,
                 event, run_id, migration, command, error_message, error_details
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            duckdb::params![
                generate_id(),
                now_ms(),
                &self.app_version,
                self.platform,
                &event.event,
                &event.run_id,
                &event.migration,
                &event.command,
                &event.error_message,
                &event.error_details,
            ],
        )?;

        Ok(())
    }

    /// Log a simple event with just a name
    pub fn log_event(&self, event: &str) -> Result<()> {
        self.log(LogEvent::new(event))
    }

    /// Log a CLI command execution
    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    /// Log an error
    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut log_event = LogEvent::new(event).with_error(message);
        if let Some(d) = details {
            log_event = log_event.with_error_details(d);
        }
        self.log(log_event)
    }

    /// Query recent events, newest first, up to `limit`.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            "SELECT id, timestamp, app_version, platform,
                    event, run_id, migration, command, error_message, error_details
             FROM sys_events
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
            limit,
        )
    }

    /// Query events that recorded an error, newest first.
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        self.query_entries(
            "SELECT id, timestamp, app_version, platform,
                    event, run_id, migration, command, error_message, error_details
             FROM sys_events
             WHERE error_message IS NOT NULL
             ORDER BY timestamp DESC, id DESC
             LIMIT ?",
            limit,
        )
    }

    fn query_entries(&self, sql: &str, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(sql)?;

        let entries = stmt
            .query_map([limit as i64], |row| {
                Ok(LogEntry {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    app_version: row.get(2)?,
                    platform: row.get(3)?,
                    event: row.get(4)?,
                    run_id: row.get(5)?,
                    migration: row.get(6)?,
                    command: row.get(7)?,
                    error_message: row.get(8)?,
                    error_details: row.get(9)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(entries)
    }

    /// Get the total number of recorded events
    pub fn count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM sys_events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete events older than the specified timestamp (unix ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute("DELETE FROM sys_events WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    /// Get the path to the events database
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("events connection lock poisoned: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        assert!(service.db_path().exists());
    }

    #[test]
    fn test_log_event() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log_event("run_started").unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "run_started");
        assert_eq!(entries[0].app_version, "1.0.0");
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "2.0.0").unwrap();

        service
            .log(
                LogEvent::new("migration_applied")
                    .with_migration("1705600800000-CreateMasterAdminPreferences")
                    .with_run_id("run-1"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "migration_applied");
        assert_eq!(
            entries[0].migration.as_deref(),
            Some("1705600800000-CreateMasterAdminPreferences")
        );
        assert_eq!(entries[0].run_id.as_deref(), Some("run-1"));
    }

    #[test]
    fn test_log_error() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service
            .log_error("migration_failed", "constraint violation", Some("NOT NULL"))
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "migration_failed");
        assert_eq!(
            errors[0].error_message.as_deref(),
            Some("constraint violation")
        );
        assert_eq!(errors[0].error_details.as_deref(), Some("NOT NULL"));
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.log_event("event1").unwrap();
        service.log_event("event2").unwrap();
        service.log_event("event3").unwrap();

        assert_eq!(service.count().unwrap(), 3);

        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_runs_no_new_migrations() {
        let dir = tempdir().unwrap();
        {
            let service = LoggingService::new(dir.path(), "1.0.0").unwrap();
            service.log_event("before_reopen").unwrap();
        }
        let service = LoggingService::new(dir.path(), "1.0.1").unwrap();
        assert_eq!(service.count().unwrap(), 1);
    }
}
