//! Category imagery moves to a single image per category: the
//! category_images table goes away and categories gain an alt_text column.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists, table_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734748800000-DropCategoryImagesAddAltText",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    if table_exists(conn, "category_images")? {
        conn.execute_batch("DROP TABLE category_images;")?;
    }
    add_column_if_missing(conn, "categories", "alt_text", "VARCHAR")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    drop_column_if_exists(conn, "categories", "alt_text")?;

    // Minimal structure; the dropped rows themselves are gone
    if !table_exists(conn, "category_images")? {
        conn.execute_batch(
            "CREATE TABLE category_images (
                 id UUID PRIMARY KEY DEFAULT uuid(),
                 category_id UUID NOT NULL,
                 image_url VARCHAR NOT NULL,
                 alt_text VARCHAR,
                 display_order INTEGER NOT NULL DEFAULT 0,
                 is_default BOOLEAN NOT NULL DEFAULT false,
                 created_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
                 updated_at TIMESTAMP NOT NULL DEFAULT current_timestamp
             );",
        )?;
    }
    Ok(())
}
