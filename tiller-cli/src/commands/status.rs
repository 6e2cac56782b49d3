//! Status command - show applied and pending migrations

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Migration Status".bold());
    println!();

    if status.applied.is_empty() {
        println!("No migrations applied yet.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Migration", "Applied At", "Revert"]);
        for entry in &status.applied {
            table.add_row(vec![
                entry.name.as_str(),
                entry.applied_at.as_str(),
                entry.revert,
            ]);
        }
        println!("{}", table);
    }
    println!();

    if status.pending.is_empty() {
        output::success(&format!(
            "Up to date: {} of {} migrations applied.",
            status.applied.len(),
            status.total_known
        ));
    } else {
        println!("{}", "Pending".bold());
        for name in &status.pending {
            println!("  - {}", name);
        }
        println!();
        output::info(&format!(
            "{} of {} migrations applied, {} pending.",
            status.applied.len(),
            status.total_known,
            status.pending.len()
        ));
    }

    if !status.unknown_entries.is_empty() {
        println!();
        output::warning(&format!(
            "{} ledger entr(ies) have no matching migration record:",
            status.unknown_entries.len()
        ));
        for name in &status.unknown_entries {
            println!("  - {}", name);
        }
    }

    Ok(())
}
