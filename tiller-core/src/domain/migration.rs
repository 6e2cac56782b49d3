//! Migration records and registry ordering
//!
//! A migration is a named pair of procedures. Names carry a millisecond
//! timestamp prefix (`1705600800000-CreateMasterAdminPreferences`) and the
//! apply order is strictly the ascending name order; the registry is
//! validated before any migration runs.

use duckdb::Connection;

use crate::domain::result::{Error, Result};

/// Forward procedure of a migration. Bodies are responsible for existence
/// checks on the structures they touch; the runner only consults the ledger.
pub type MigrationFn = fn(&Connection) -> Result<()>;

/// How a migration can be undone.
///
/// Irreversibility is part of the record type so a revert can be refused
/// before anything touches the database, instead of a `down` procedure
/// failing at call time.
#[derive(Clone, Copy)]
pub enum Revert {
    /// A structural revert exists.
    Reversible(MigrationFn),
    /// Append-only change with nothing to structurally undo. Reverting
    /// removes the ledger entry and surfaces the note as a warning.
    AppendOnly(&'static str),
    /// Revert is refused with this reason; the ledger entry stays.
    Irreversible(&'static str),
}

/// A single named, timestamped schema change.
#[derive(Clone, Copy)]
pub struct MigrationRecord {
    /// `<millisecond-timestamp>-<Description>`; the prefix fixes apply order.
    pub name: &'static str,
    pub up: MigrationFn,
    pub down: Revert,
}

impl MigrationRecord {
    /// The millisecond timestamp encoded in the name.
    pub fn timestamp(&self) -> Result<i64> {
        timestamp_prefix(self.name)
    }

    /// Short label describing how this record reverts, for status output.
    pub fn revert_label(&self) -> &'static str {
        match self.down {
            Revert::Reversible(_) => "yes",
            Revert::AppendOnly(_) => "append-only",
            Revert::Irreversible(_) => "one-way",
        }
    }
}

/// Parse the millisecond timestamp prefix of a migration name.
pub fn timestamp_prefix(name: &str) -> Result<i64> {
    let (prefix, description) = name.split_once('-').ok_or_else(|| {
        Error::ordering(format!(
            "malformed migration name '{name}': expected <timestamp>-<Description>"
        ))
    })?;
    if description.is_empty() {
        return Err(Error::ordering(format!(
            "malformed migration name '{name}': missing description"
        )));
    }
    prefix.parse::<i64>().map_err(|_| {
        Error::ordering(format!(
            "malformed migration name '{name}': '{prefix}' is not a timestamp"
        ))
    })
}

/// Check that a registry is well-formed: every name parses and timestamps
/// are strictly increasing (which also rules out duplicates).
pub fn validate_registry(records: &[MigrationRecord]) -> Result<()> {
    let mut prev: Option<(&str, i64)> = None;
    for record in records {
        let ts = timestamp_prefix(record.name)?;
        if let Some((prev_name, prev_ts)) = prev {
            if ts <= prev_ts {
                return Err(Error::ordering(format!(
                    "'{}' is listed after '{}' but does not sort above it",
                    record.name, prev_name
                )));
            }
        }
        prev = Some((record.name, ts));
    }
    Ok(())
}
