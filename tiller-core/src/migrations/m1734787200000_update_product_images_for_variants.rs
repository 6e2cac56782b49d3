//! Ties product images to variants: variant_id, denormalized
//! variant_weight, and an image_type discriminator (hero-card, info-card,
//! other).

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists, index_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1734787200000-UpdateProductImagesForVariantStructure",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "product_images", "variant_id", "UUID")?;
    add_column_if_missing(conn, "product_images", "variant_weight", "VARCHAR")?;
    add_column_if_missing(conn, "product_images", "image_type", "VARCHAR DEFAULT 'other'")?;

    if !index_exists(conn, "idx_product_images_variant_type")? {
        conn.execute_batch(
            "CREATE INDEX idx_product_images_variant_type
             ON product_images (variant_id, image_type);",
        )?;
    }
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP INDEX IF EXISTS idx_product_images_variant_type;")?;
    drop_column_if_exists(conn, "product_images", "image_type")?;
    drop_column_if_exists(conn, "product_images", "variant_weight")?;
    drop_column_if_exists(conn, "product_images", "variant_id")?;
    Ok(())
}
