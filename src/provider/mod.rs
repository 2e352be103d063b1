//! Upstream source adapters.
//!
//! The wire format of a source site is deliberately not part of the core
//! pipeline. It lives behind [`SourceProvider`] so a site redesign means
//! touching one adapter, and tests can script an in-memory upstream
//! without a network in sight.

pub mod filehost;

pub use filehost::FileHostProvider;

use async_trait::async_trait;
use url::Url;

use crate::descriptor::RouteDescriptor;
use crate::error::Result;
use crate::http_client::SourceClient;
use crate::task::Trace;

/// Adapter for one family of upstream source sites.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Short lowercase name for log lines.
    fn name(&self) -> &'static str;

    /// Whether this provider understands the given source URL.
    fn matches(&self, url: &Url) -> bool;

    /// Enumerate the download variants offered behind `url`, preserving the
    /// upstream's own ordering. An empty list is a valid answer, distinct
    /// from failure.
    async fn discover_routes(
        &self,
        http: &SourceClient,
        url: &Url,
        trace: &Trace,
    ) -> Result<Vec<RouteDescriptor>>;

    /// Resolve the playable URL for one discovered route. `position` is the
    /// route's index within the discovery ordering.
    async fn resolve_playback(
        &self,
        http: &SourceClient,
        url: &Url,
        route: &RouteDescriptor,
        position: usize,
        trace: &Trace,
    ) -> Result<String>;

    /// Follow a descriptor's internal download route to the final,
    /// directly fetchable URL.
    async fn resolve_direct_link(
        &self,
        http: &SourceClient,
        route: &Url,
        trace: &Trace,
    ) -> Result<String>;
}
