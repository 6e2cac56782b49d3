//! Keyed preference storage for the master admin account.

use duckdb::Connection;

use crate::adapters::duckdb::table_exists;
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1705600800000-CreateMasterAdminPreferences",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    if table_exists(conn, "master_admin_preferences")? {
        return Ok(());
    }
    conn.execute_batch(
        "CREATE TABLE master_admin_preferences (
             id UUID PRIMARY KEY DEFAULT uuid(),
             \"key\" VARCHAR NOT NULL UNIQUE,
             \"value\" VARCHAR NOT NULL,
             description VARCHAR,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_master_admin_preferences_key ON master_admin_preferences (\"key\");",
    )?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS master_admin_preferences;")?;
    Ok(())
}
