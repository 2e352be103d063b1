//! Subcommand implementations and their shared plumbing.

pub mod link;
pub mod routes;
pub mod streams;

use std::sync::Arc;

use anyhow::Result;

use vidroute::{FileHostProvider, ResolutionClient, TaskResult};

/// Build a client, widening the built-in host list with any extra mirrors
/// given on the command line.
pub fn build_client(allow_hosts: &[String]) -> Result<ResolutionClient> {
    let client = if allow_hosts.is_empty() {
        ResolutionClient::new()?
    } else {
        ResolutionClient::with_provider(Arc::new(FileHostProvider::with_hosts(
            allow_hosts.iter().cloned(),
        )))?
    };
    Ok(client)
}

/// Unwrap a delivered task, printing its trace when asked and turning a
/// failure result into a process-level error.
pub fn unwrap_task<T>(task: TaskResult<T>, show_trace: bool) -> Result<T> {
    let (outcome, trace) = task.into_parts();
    if show_trace && !trace.is_empty() {
        eprintln!("── trace ─────────────────────────────────────");
        eprint!("{trace}");
        eprintln!("──────────────────────────────────────────────");
    }
    outcome.map_err(|error| anyhow::anyhow!("{}: {error}", error.kind()))
}

/// Human display for a byte count reported by the upstream.
#[must_use]
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "size unknown".into();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
