//! Guest wishlists: session-keyed rows with an expiry, user_id becomes
//! nullable. Also drops carts.currency - the store sells in a single
//! currency.
//!
//! The per-user unique index is dropped and recreated around the
//! nullability change; indexed columns cannot be altered in place. DuckDB
//! treats NULL index keys as distinct, so the per-user and per-session
//! unique indexes coexist without partial-index support.

use duckdb::Connection;

use crate::adapters::duckdb::{add_column_if_missing, drop_column_if_exists, index_exists};
use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1736630000001-AddGuestWishlistAndRemoveCurrency",
    up,
    down: Revert::Reversible(down),
};

fn up(conn: &Connection) -> Result<()> {
    add_column_if_missing(conn, "wishlists", "session_id", "VARCHAR")?;
    add_column_if_missing(conn, "wishlists", "expires_at", "TIMESTAMP")?;

    conn.execute_batch(
        "DROP INDEX IF EXISTS uq_wishlists_user_product_variant;
         DROP INDEX IF EXISTS idx_wishlists_variant;
         ALTER TABLE wishlists ALTER COLUMN user_id DROP NOT NULL;
         CREATE UNIQUE INDEX uq_wishlists_user_product_variant
             ON wishlists (user_id, product_id, variant_id);
         CREATE INDEX idx_wishlists_variant ON wishlists (variant_id);",
    )?;

    if !index_exists(conn, "idx_wishlists_session")? {
        conn.execute_batch("CREATE INDEX idx_wishlists_session ON wishlists (session_id);")?;
    }
    if !index_exists(conn, "uq_wishlists_session_product_variant")? {
        conn.execute_batch(
            "CREATE UNIQUE INDEX uq_wishlists_session_product_variant
             ON wishlists (session_id, product_id, variant_id);",
        )?;
    }

    drop_column_if_exists(conn, "carts", "currency")?;
    Ok(())
}

fn down(conn: &Connection) -> Result<()> {
    // Guest rows cannot satisfy the restored NOT NULL constraint
    conn.execute("DELETE FROM wishlists WHERE user_id IS NULL", [])?;

    conn.execute_batch(
        "DROP INDEX IF EXISTS uq_wishlists_session_product_variant;
         DROP INDEX IF EXISTS idx_wishlists_session;
         DROP INDEX IF EXISTS uq_wishlists_user_product_variant;
         DROP INDEX IF EXISTS idx_wishlists_variant;
         ALTER TABLE wishlists ALTER COLUMN user_id SET NOT NULL;
         CREATE UNIQUE INDEX uq_wishlists_user_product_variant
             ON wishlists (user_id, product_id, variant_id);
         CREATE INDEX idx_wishlists_variant ON wishlists (variant_id);",
    )?;

    drop_column_if_exists(conn, "wishlists", "expires_at")?;
    drop_column_if_exists(conn, "wishlists", "session_id")?;

    add_column_if_missing(conn, "carts", "currency", "VARCHAR NOT NULL DEFAULT 'INR'")?;
    Ok(())
}
