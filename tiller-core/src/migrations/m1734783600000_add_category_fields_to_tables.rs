//! Denormalizes category identity onto the product-related tables so list
//! views can render without a join.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

const TABLES: &[&str] = &["product_images", "product_variants", "product_views"];

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734783600000-AddCategoryFieldsToTables",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    for table in TABLES {
        add_column_if_missing(conn, table, "category_id", "UUID")?;
        add_column_if_missing(conn, table, "category_name", "VARCHAR")?;
    }
    // products already has category_id via its foreign key
    add_column_if_missing(conn, "products", "category_name", "VARCHAR")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    drop_column_if_exists(conn, "products", "category_name")?;
    for table in TABLES {
        drop_column_if_exists(conn, table, "category_name")?;
        drop_column_if_exists(conn, table, "category_id")?;
    }
    Ok(())
}
