//! Adds the out_for_delivery order status between shipped and delivered.

use duckdb::{params, Connection};

use crate::domain::migration::{MigrationRecord, Revert};
use crate::domain::Result;

pub const RECORD: MigrationRecord = MigrationRecord {
    name: "1737811200000-AddOutForDeliveryStatus",
    up,
    // Status values are append-only: orders and order_status_history rows
    // may reference the value once it exists.
    down: Revert::AppendOnly(
        "order status values are append-only; 'out_for_delivery' stays in order_statuses",
    ),
};

fn up(conn: &Connection) -> Result<()> {
    let present: i64 = conn.query_row(
        "SELECT COUNT(*) FROM order_statuses WHERE value = ?",
        params!["out_for_delivery"],
        |row| row.get(0),
    )?;
    if present > 0 {
        return Ok(());
    }
    // Slots between 'shipped' (40) and 'delivered' (50)
    conn.execute(
        "INSERT INTO order_statuses (value, sort_order) VALUES ('out_for_delivery', 45)",
        [],
    )?;
    Ok(())
}
