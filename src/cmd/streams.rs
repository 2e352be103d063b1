use std::time::Duration;

use anyhow::Result;

use vidroute::ResolutionConfig;

use super::{build_client, human_size, unwrap_task};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_streams(
    url: &str,
    timeout_ms: u64,
    gap_ms: u64,
    skip_resolution: bool,
    allow_hosts: &[String],
    json: bool,
    show_trace: bool,
) -> Result<()> {
    let mut builder = ResolutionConfig::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .gap(Duration::from_millis(gap_ms));
    if skip_resolution {
        builder = builder.skip_resolution();
    }
    let config = builder.build()?;
    let client = build_client(allow_hosts)?;

    eprintln!("📡 Resolving streams: {url}");
    let task = client.fetch_streams(url, &config).join().await?;
    let streams = unwrap_task(task, show_trace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&streams)?);
        return Ok(());
    }
    if streams.is_empty() {
        println!("No streams offered.");
        return Ok(());
    }
    for (index, stream) in streams.iter().enumerate() {
        println!(
            "  [{index}] {} ({})\n      {}",
            stream.resolution,
            human_size(stream.size_bytes),
            stream.url
        );
    }
    Ok(())
}
