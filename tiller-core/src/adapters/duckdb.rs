//! DuckDB schema target
//!
//! Wraps the database whose structure the migrations mutate, plus the
//! `sys_migrations` ledger and the introspection helpers migration bodies
//! use for their existence checks.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::{params, Connection};

use crate::domain::{Error, LedgerEntry, Result};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// The relational database being evolved.
///
/// Holds a single connection behind a mutex. The connection is opened once
/// per process; schema structure is never cached here beyond a single call.
pub struct DuckDbTarget {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbTarget {
    /// Open the target database file.
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which occur when another process (a competing deploy replica,
    /// an inspection shell) still has the file open.
    pub fn open(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[tiller] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(Error::Connection(err_msg));
                }
            }
        }

        Err(Error::Connection(last_error.map_or_else(
            || format!("failed to open database after {MAX_RETRIES} retries"),
            |e| e.to_string(),
        )))
    }

    /// Open an in-memory target (tests).
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default()
            .enable_autoload_extension(false)
            .map_err(|e| Error::Connection(e.to_string()))?;
        let conn = Connection::open_in_memory_with_flags(config)
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Attempt to open a database connection (called by open() with retry logic)
    fn try_open(db_path: &Path) -> std::result::Result<Connection, duckdb::Error> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` with the live connection.
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::database(format!("connection lock poisoned: {e}")))?;
        f(&conn)
    }

    /// Run `f` inside an explicit transaction.
    ///
    /// Commits on success; rolls back on error so no partial change
    /// survives. A rollback failure is surfaced rather than masked.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::database(format!("connection lock poisoned: {e}")))?;
        conn.execute_batch("BEGIN TRANSACTION")?;
        match f(&conn) {
            Ok(value) => {
                conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                    return Err(Error::database(format!(
                        "rollback failed after '{e}': {rollback_err}"
                    )));
                }
                Err(e)
            }
        }
    }
}

// === Ledger operations ===

/// Create the ledger table on first run against a target.
pub fn ensure_ledger(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS sys_migrations (
             name VARCHAR PRIMARY KEY,
             applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );",
    )?;
    Ok(())
}

/// Check whether the ledger table exists yet.
pub fn ledger_exists(conn: &Connection) -> Result<bool> {
    let result: std::result::Result<i64, _> = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
        [],
        |row| row.get(0),
    );
    match result {
        Ok(count) => Ok(count > 0),
        Err(_) => Ok(false),
    }
}

/// Read the full ledger, oldest entry first.
pub fn read_ledger(conn: &Connection) -> Result<Vec<LedgerEntry>> {
    let mut stmt = conn.prepare(
        "SELECT name, applied_at::VARCHAR FROM sys_migrations ORDER BY applied_at, name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (name, applied_at) = row?;
        entries.push(LedgerEntry {
            name,
            applied_at: parse_timestamp(&applied_at),
        });
    }
    Ok(entries)
}

/// Record a migration as applied. Must run inside the same transaction as
/// the migration body so both commit or roll back together.
pub fn record_applied(conn: &Connection, name: &str) -> Result<()> {
    conn.execute("INSERT INTO sys_migrations (name) VALUES (?)", params![name])?;
    Ok(())
}

/// Remove a ledger entry after a successful revert.
pub fn remove_entry(conn: &Connection, name: &str) -> Result<()> {
    let deleted = conn.execute("DELETE FROM sys_migrations WHERE name = ?", params![name])?;
    if deleted == 0 {
        return Err(Error::database(format!("no ledger entry for '{name}'")));
    }
    Ok(())
}

// === Introspection helpers for migration bodies ===

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.columns
         WHERE table_name = ? AND column_name = ?",
        params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn index_exists(conn: &Connection, index: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM duckdb_indexes() WHERE index_name = ?",
        params![index],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Add a column unless it is already present. Returns whether it was added.
///
/// `definition` is the column type plus any constraints, e.g.
/// `"VARCHAR"` or `"INTEGER NOT NULL DEFAULT 0"`.
pub fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool> {
    if column_exists(conn, table, column)? {
        return Ok(false);
    }
    conn.execute_batch(&format!(
        "ALTER TABLE {table} ADD COLUMN {column} {definition};"
    ))?;
    Ok(true)
}

/// Drop a column if it is present. Returns whether it was dropped.
pub fn drop_column_if_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    if !column_exists(conn, table, column)? {
        return Ok(false);
    }
    conn.execute_batch(&format!("ALTER TABLE {table} DROP COLUMN {column};"))?;
    Ok(true)
}

/// Parse a DuckDB timestamp string; falls back to now() on garbage rather
/// than failing a ledger read.
fn parse_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
        .unwrap_or_else(|_| Utc::now())
}
