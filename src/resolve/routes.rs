//! Route discovery, the cheapest stage.

use std::sync::Arc;

use url::Url;

use crate::descriptor::RouteDescriptor;
use crate::error::Result;
use crate::http_client::SourceClient;
use crate::provider::SourceProvider;
use crate::task::Trace;

/// Discovers the download variants behind a source URL without resolving
/// any playable links. Suited to UIs that only need a variant picker.
pub struct RouteResolver {
    http: Arc<SourceClient>,
    provider: Arc<dyn SourceProvider>,
}

impl RouteResolver {
    #[must_use]
    pub fn new(http: Arc<SourceClient>, provider: Arc<dyn SourceProvider>) -> Self {
        Self { http, provider }
    }

    /// Enumerate routes in the upstream's own order. Zero routes is a valid
    /// success; removed or not-yet-processed videos legitimately offer none.
    pub async fn fetch(&self, url: &Url, trace: &Trace) -> Result<Vec<RouteDescriptor>> {
        trace.push("- started route discovery");
        trace.push(format!("- target url {url}"));
        let routes = self.provider.discover_routes(&self.http, url, trace).await?;
        trace.push(format!("- discovered {} route(s)", routes.len()));
        Ok(routes)
    }
}
