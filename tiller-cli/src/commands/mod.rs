//! CLI command implementations

pub mod doctor;
pub mod logs;
pub mod revert;
pub mod status;
pub mod up;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiller_core::{LogEvent, LoggingService, TillerContext};

/// Get the tiller directory from environment or default
pub fn get_tiller_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TILLER_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".tiller")
    }
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let tiller_dir = get_tiller_dir();
    std::fs::create_dir_all(&tiller_dir).ok()?;
    LoggingService::new(&tiller_dir, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors (logging should never break the tool)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get or create the tiller context, with the event logger attached
pub fn get_context() -> Result<TillerContext> {
    let tiller_dir = get_tiller_dir();

    std::fs::create_dir_all(&tiller_dir)
        .with_context(|| format!("Failed to create tiller directory: {:?}", tiller_dir))?;

    let ctx = TillerContext::new(&tiller_dir).context("Failed to initialize tiller context")?;

    Ok(match get_logger() {
        Some(logger) => ctx.with_logger(logger),
        None => ctx,
    })
}
