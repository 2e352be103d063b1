use std::time::Duration;

use anyhow::Result;

use vidroute::ResolutionConfig;

use super::{build_client, human_size, unwrap_task};

pub async fn cmd_routes(
    url: &str,
    timeout_ms: u64,
    allow_hosts: &[String],
    json: bool,
    show_trace: bool,
) -> Result<()> {
    let config = ResolutionConfig::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let client = build_client(allow_hosts)?;

    eprintln!("📡 Discovering routes: {url}");
    let task = client.fetch_routes(url, &config).join().await?;
    let routes = unwrap_task(task, show_trace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }
    if routes.is_empty() {
        println!("No download variants offered.");
        return Ok(());
    }
    for (index, route) in routes.iter().enumerate() {
        println!(
            "  [{index}] {route} ({}) - {}",
            route.resolution,
            human_size(route.size_bytes)
        );
    }
    Ok(())
}
