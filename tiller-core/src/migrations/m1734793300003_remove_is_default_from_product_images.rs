//! The hero-card image_type replaces the is_default flag.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734793300003-RemoveIsDefaultFromProductImages",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    drop_column_if_exists(conn, "product_images", "is_default")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    add_column_if_missing(
        conn,
        "product_images",
        "is_default",
        "BOOLEAN NOT NULL DEFAULT false",
    )?;
    Ok(())
}
