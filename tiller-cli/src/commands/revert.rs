//! Revert command - roll back the most recently applied migrations

use anyhow::Result;
use dialoguer::Confirm;
use tiller_core::LogEvent;

use super::{get_context, log_event};
use crate::output;

pub fn run(steps: usize, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Revert the last {} migration(s)?", steps))
            .default(false)
            .interact()?;
        if !confirmed {
            output::info("Aborted.");
            return Ok(());
        }
    }

    let ctx = get_context()?;
    log_event(
        &ctx.logger,
        LogEvent::new("command_executed").with_command("revert"),
    );

    let outcome = ctx.runner.revert_last(steps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.reverted.is_empty() {
        output::info("Nothing to revert.");
    } else {
        output::success(&format!(
            "Reverted {} migration(s):",
            outcome.reverted.len()
        ));
        for name in &outcome.reverted {
            println!("  - {}", name);
        }
    }

    for warning in &outcome.warnings {
        output::warning(&format!("note: {}", warning));
    }

    Ok(())
}
