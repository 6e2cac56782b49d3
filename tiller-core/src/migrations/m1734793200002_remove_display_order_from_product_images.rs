//! Image ordering is now derived from image_type; display_order goes.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists, index_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734793200002-RemoveDisplayOrderFromProductImages",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP INDEX IF EXISTS idx_product_images_order;")?;
    drop_column_if_exists(conn, "product_images", "display_order")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    add_column_if_missing(
        conn,
        "product_images",
        "display_order",
        "INTEGER NOT NULL DEFAULT 0",
    )?;
    if !index_exists(conn, "idx_product_images_order")? {
        conn.execute_batch(
            "CREATE INDEX idx_product_images_order
             ON product_images (display_order, is_default);",
        )?;
    }
    Ok(())
}
