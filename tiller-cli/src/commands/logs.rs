//! Logs command - show recent runner events

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::get_logger;
use crate::output;

fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

pub fn run(limit: usize, errors: bool, prune_days: Option<u32>, json: bool) -> Result<()> {
    let logger = get_logger().context("Failed to open the events database")?;

    if let Some(days) = prune_days {
        let cutoff = Utc::now().timestamp_millis() - i64::from(days) * 86_400_000;
        let deleted = logger.delete_before(cutoff)?;
        output::info(&format!("Pruned {} event(s).", deleted));
    }

    let entries = if errors {
        logger.get_errors(limit)?
    } else {
        logger.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No events recorded.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Migration", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event.clone(),
            entry.migration.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}
