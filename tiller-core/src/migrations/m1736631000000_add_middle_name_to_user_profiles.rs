//! Adds middle_name to user profiles.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1736631000000-AddMiddleNameToUserProfiles",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "user_profiles", "middle_name", "VARCHAR")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    drop_column_if_exists(conn, "user_profiles", "middle_name")?;
    Ok(())
}
