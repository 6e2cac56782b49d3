//! Up command - apply pending migrations

use anyhow::Result;
use tiller_core::LogEvent;

use super::{get_context, log_event};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    log_event(
        &ctx.logger,
        LogEvent::new("command_executed").with_command("up"),
    );

    let outcome = ctx.runner.run_pending()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.applied.is_empty() {
        output::info("No migrations to run.");
    } else {
        output::success(&format!(
            "Applied {} migration(s):",
            outcome.applied.len()
        ));
        for name in &outcome.applied {
            println!("  - {}", name);
        }
    }

    if outcome.already_applied > 0 {
        println!("{} already applied.", outcome.already_applied);
    }

    Ok(())
}
