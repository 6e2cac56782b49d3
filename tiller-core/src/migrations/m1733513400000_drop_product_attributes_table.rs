//! Drops the unused product_attributes table.

use duckdb::Connection;

use crate::adapters::duckdb::table_exists;
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1733513400000-DropProductAttributesTable",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "product_attributes")? {
        return Ok(());
    }
    conn.execute_batch("DROP TABLE product_attributes;")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    if table_exists(conn, "product_attributes")? {
        return Ok(());
    }
    conn.execute_batch(
        "CREATE TABLE product_attributes (
             id UUID PRIMARY KEY DEFAULT uuid(),
             product_id UUID NOT NULL,
             name VARCHAR NOT NULL,
             created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
             updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
         );
         CREATE INDEX idx_product_attributes_product ON product_attributes (product_id);",
    )?;
    Ok(())
}
