//! Doctor command - run ledger and registry health checks

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use super::get_context;
use crate::output;

pub fn run(verbose: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.doctor_service.run_checks()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", "Ledger Health Check".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Message"]);

    let mut check_names: Vec<&String> = result.checks.keys().collect();
    check_names.sort();

    for check_name in check_names {
        let check_result = &result.checks[check_name];
        let status_cell = match check_result.status.as_str() {
            "pass" => Cell::new("PASS").fg(Color::Green),
            "warning" => Cell::new("WARN").fg(Color::Yellow),
            "error" => Cell::new("ERROR").fg(Color::Red),
            _ => Cell::new(&check_result.status),
        };

        table.add_row(vec![
            Cell::new(check_name),
            status_cell,
            Cell::new(&check_result.message),
        ]);

        if verbose {
            if let Some(details) = &check_result.details {
                for detail in details {
                    table.add_row(vec![
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(format!("  - {}", detail)),
                    ]);
                }
            }
        }
    }

    println!("{}", table);
    println!();

    if result.healthy {
        output::success("No problems found.");
    } else {
        output::error("Problems found - see errors above.");
        anyhow::bail!("health check failed");
    }

    Ok(())
}
