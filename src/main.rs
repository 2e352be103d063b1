//! `vidroute` CLI - resolve file-host videos into fetchable links

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "vidroute")]
#[command(about = "Resolve file-host videos into routes, streams and direct links")]
#[command(version)]
struct Cli {
    /// Log progress lines as they happen
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the download variants offered for a source URL
    Routes {
        /// Source page URL
        url: String,

        /// Whole-call budget in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout: u64,

        /// Claim an extra mirror host (repeatable)
        #[arg(long = "allow-host", value_name = "HOST")]
        allow_hosts: Vec<String>,

        /// Emit JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Print the call's diagnostic trace afterwards
        #[arg(short, long)]
        trace: bool,
    },

    /// Resolve the playable streams behind a source URL
    Streams {
        /// Source page URL
        url: String,

        /// Whole-call budget in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout: u64,

        /// Pacing delay before the resolution pass, in milliseconds
        #[arg(long, default_value_t = 1_000)]
        gap: u64,

        /// Stop after discovery; reuse each route's own link
        #[arg(long)]
        skip_resolution: bool,

        /// Claim an extra mirror host (repeatable)
        #[arg(long = "allow-host", value_name = "HOST")]
        allow_hosts: Vec<String>,

        /// Emit JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Print the call's diagnostic trace afterwards
        #[arg(short, long)]
        trace: bool,
    },

    /// Resolve one variant into its direct download link
    Link {
        /// Source page URL
        url: String,

        /// Variant position as printed by `routes`
        #[arg(short, long)]
        index: usize,

        /// Pick the variant from resolved streams instead of routes
        #[arg(long)]
        via_streams: bool,

        /// Whole-call budget in milliseconds
        #[arg(long, default_value_t = 10_000)]
        timeout: u64,

        /// Pacing delay before the resolution pass, in milliseconds
        #[arg(long, default_value_t = 1_000)]
        gap: u64,

        /// Claim an extra mirror host (repeatable)
        #[arg(long = "allow-host", value_name = "HOST")]
        allow_hosts: Vec<String>,

        /// Print the call's diagnostic trace afterwards
        #[arg(short, long)]
        trace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("vidroute {} starting", vidroute::VERSION);

    match cli.command {
        Commands::Routes { url, timeout, allow_hosts, json, trace } => {
            cmd::routes::cmd_routes(&url, timeout, &allow_hosts, json, trace).await?;
        }
        Commands::Streams {
            url,
            timeout,
            gap,
            skip_resolution,
            allow_hosts,
            json,
            trace,
        } => {
            cmd::streams::cmd_streams(
                &url,
                timeout,
                gap,
                skip_resolution,
                &allow_hosts,
                json,
                trace,
            )
            .await?;
        }
        Commands::Link { url, index, via_streams, timeout, gap, allow_hosts, trace } => {
            cmd::link::cmd_link(&url, index, via_streams, timeout, gap, &allow_hosts, trace)
                .await?;
        }
    }

    Ok(())
}
