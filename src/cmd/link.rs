use std::time::Duration;

use anyhow::{anyhow, Result};

use vidroute::{Descriptor, DirectLink, ResolutionClient, ResolutionConfig};

use super::{build_client, unwrap_task};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_link(
    url: &str,
    index: usize,
    via_streams: bool,
    timeout_ms: u64,
    gap_ms: u64,
    allow_hosts: &[String],
    show_trace: bool,
) -> Result<()> {
    let config = ResolutionConfig::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .gap(Duration::from_millis(gap_ms))
        .build()?;
    let client = build_client(allow_hosts)?;

    let link = if via_streams {
        eprintln!("📡 Resolving streams: {url}");
        let task = client.fetch_streams(url, &config).join().await?;
        let streams = unwrap_task(task, show_trace)?;
        let stream = streams.get(index).ok_or_else(|| {
            anyhow!("no stream at index {index} ({} available)", streams.len())
        })?;
        follow(&client, stream, &config, show_trace).await?
    } else {
        eprintln!("📡 Discovering routes: {url}");
        let task = client.fetch_routes(url, &config).join().await?;
        let routes = unwrap_task(task, show_trace)?;
        let route = routes.get(index).ok_or_else(|| {
            anyhow!("no route at index {index} ({} available)", routes.len())
        })?;
        follow(&client, route, &config, show_trace).await?
    };

    println!("{link}");
    Ok(())
}

async fn follow(
    client: &ResolutionClient,
    descriptor: &dyn Descriptor,
    config: &ResolutionConfig,
    show_trace: bool,
) -> Result<DirectLink> {
    eprintln!("🔗 Following {}", descriptor.label());
    let task = client.fetch_direct_link(descriptor, config).join().await?;
    unwrap_task(task, show_trace)
}
