//! Adds a phone number to users for OTP login, unique per account.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists, index_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1736700000000-AddPhoneToUsers",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "users", "phone", "VARCHAR")?;
    if !index_exists(conn, "idx_users_phone")? {
        conn.execute_batch("CREATE UNIQUE INDEX idx_users_phone ON users (phone);")?;
    }
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP INDEX IF EXISTS idx_users_phone;")?;
    drop_column_if_exists(conn, "users", "phone")?;
    Ok(())
}
