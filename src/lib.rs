//! `vidroute` - Async media-source resolution client
//!
//! # Features
//!
//! - **Route discovery**: enumerate the download variants (quality,
//!   resolution, size) a file host offers behind a source URL
//! - **Stream resolution**: pair every variant with its playable URL, with
//!   a configurable pacing gap and an optional skip of the resolution pass
//! - **Direct links**: follow any previously fetched descriptor to its
//!   final, directly fetchable download URL
//! - **One result channel**: each call delivers exactly one [`TaskResult`]
//!   carrying either payload or error, plus a diagnostic trace; overruns
//!   and bad input arrive the same way
//! - **Cancellation**: every call hands back a [`ResolutionCall`] that can
//!   stop it without touching its siblings
//!
//! # Example
//!
//! ```rust,no_run
//! use vidroute::{ResolutionClient, ResolutionConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ResolutionClient::new()?;
//!     let config = ResolutionConfig::default();
//!     let task = client
//!         .fetch_routes("https://sbembed.com/e/abc123", &config)
//!         .join()
//!         .await?;
//!     for route in task.payload().into_iter().flatten() {
//!         println!("{route}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod resolve;
pub mod task;

pub use client::{CallState, ResolutionCall, ResolutionClient};
pub use config::{ConfigBuilder, ResolutionConfig, DEFAULT_RESOLUTION_GAP, DEFAULT_TIMEOUT};
pub use descriptor::{Descriptor, DirectLink, RouteDescriptor, StreamDescriptor};
pub use error::ResolutionError;
pub use http_client::SourceClient;
pub use provider::{FileHostProvider, SourceProvider};
pub use resolve::{DirectLinkResolver, RouteResolver, StreamResolver};
pub use task::{TaskResult, Trace};

/// Version of vidroute
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
