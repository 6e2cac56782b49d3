//! Offers moved to the coupon system; the per-variant offer column goes.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734789000001-RemoveOfferFromProductVariants",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    drop_column_if_exists(conn, "product_variants", "offer")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "product_variants", "offer", "VARCHAR")?;
    Ok(())
}
