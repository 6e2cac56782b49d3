//! Makes wishlists and cart items variant-aware.
//!
//! Cart items previously stored the variant as a free-form weight string;
//! this backfills variant_weight from it, maps rows to real variant ids by
//! joining on weight, and then drops the legacy column.

use duckdb::Connection;

use crate::adapters::duckdb::{
    add_column_if_missing, column_exists, drop_column_if_exists, index_exists,
};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1736630000000-UpdateWishlistAndCartVariants",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    // wishlists: same product with different variants may now coexist
    add_column_if_missing(conn, "wishlists", "variant_id", "UUID")?;
    if !index_exists(conn, "idx_wishlists_variant")? {
        conn.execute_batch("CREATE INDEX idx_wishlists_variant ON wishlists (variant_id);")?;
    }
    conn.execute_batch("DROP INDEX IF EXISTS uq_wishlists_user_product;")?;
    if !index_exists(conn, "uq_wishlists_user_product_variant")? {
        conn.execute_batch(
            "CREATE UNIQUE INDEX uq_wishlists_user_product_variant
             ON wishlists (user_id, product_id, variant_id);",
        )?;
    }

    // cart_items: structured variant reference plus denormalized display fields
    add_column_if_missing(conn, "cart_items", "variant_id", "UUID")?;
    add_column_if_missing(conn, "cart_items", "variant_weight", "VARCHAR")?;
    add_column_if_missing(conn, "cart_items", "product_name", "VARCHAR")?;
    add_column_if_missing(conn, "cart_items", "price", "DECIMAL(10,2) NOT NULL DEFAULT 0")?;

    if column_exists(conn, "cart_items", "variant")? {
        conn.execute(
            "UPDATE cart_items SET variant_weight = variant WHERE variant IS NOT NULL",
            [],
        )?;
        // Best-effort mapping from the legacy weight string to a variant id
        conn.execute(
            "UPDATE cart_items
             SET variant_id = pv.id
             FROM product_variants pv
             WHERE cart_items.product_id = pv.product_id
               AND cart_items.variant = pv.weight
               AND cart_items.variant_id IS NULL",
            [],
        )?;
        conn.execute_batch("ALTER TABLE cart_items DROP COLUMN variant;")?;
    }

    if !index_exists(conn, "idx_cart_items_variant")? {
        conn.execute_batch("CREATE INDEX idx_cart_items_variant ON cart_items (variant_id);")?;
    }
    if !index_exists(conn, "idx_cart_items_cart_variant")? {
        conn.execute_batch(
            "CREATE INDEX idx_cart_items_cart_variant ON cart_items (cart_id, variant_id);",
        )?;
    }
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    // cart_items
    add_column_if_missing(conn, "cart_items", "variant", "VARCHAR")?;
    conn.execute(
        "UPDATE cart_items SET variant = variant_weight WHERE variant_weight IS NOT NULL",
        [],
    )?;
    conn.execute_batch(
        "DROP INDEX IF EXISTS idx_cart_items_cart_variant;
         DROP INDEX IF EXISTS idx_cart_items_variant;",
    )?;
    drop_column_if_exists(conn, "cart_items", "variant_weight")?;
    drop_column_if_exists(conn, "cart_items", "variant_id")?;

    // wishlists
    conn.execute_batch(
        "DROP INDEX IF EXISTS uq_wishlists_user_product_variant;
         DROP INDEX IF EXISTS idx_wishlists_variant;",
    )?;
    drop_column_if_exists(conn, "wishlists", "variant_id")?;
    if !index_exists(conn, "uq_wishlists_user_product")? {
        conn.execute_batch(
            "CREATE UNIQUE INDEX uq_wishlists_user_product ON wishlists (user_id, product_id);",
        )?;
    }
    Ok(())
}
