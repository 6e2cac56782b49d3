//! Removes duplicate product rows, matching names case-insensitively and
//! keeping the oldest row in each group.

use duckdb::Connection;

use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1733584800000-RemoveDuplicateProducts",
    up,
    down: Revert::Irreversible(
        "duplicate product rows were permanently deleted and cannot be restored",
    ),
};

fn up(conn: &Connection) -> Result<()> {
    let duplicates: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (
             SELECT row_number() OVER (
                 PARTITION BY lower(name) ORDER BY created_at, id
             ) AS rn
             FROM products
         ) WHERE rn > 1",
        [],
        |row| row.get(0),
    )?;
    if duplicates == 0 {
        return Ok(());
    }

    conn.execute(
        "DELETE FROM products WHERE id IN (
             SELECT id FROM (
                 SELECT id, row_number() OVER (
                     PARTITION BY lower(name) ORDER BY created_at, id
                 ) AS rn
                 FROM products
             ) WHERE rn > 1
         )",
        [],
    )?;
    Ok(())
}
