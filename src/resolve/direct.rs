//! Direct-link resolution for previously fetched descriptors.

use std::sync::Arc;

use url::Url;

use crate::descriptor::{Descriptor, DirectLink};
use crate::error::{ResolutionError, Result};
use crate::http_client::SourceClient;
use crate::provider::SourceProvider;
use crate::task::Trace;

/// Follows a descriptor's internal download route to the final URL.
///
/// Works on routes and streams alike; both carry the route their variant
/// was discovered under. The link that comes back is typically
/// token-bearing and expires, so callers should fetch it promptly.
pub struct DirectLinkResolver {
    http: Arc<SourceClient>,
    provider: Arc<dyn SourceProvider>,
}

impl DirectLinkResolver {
    #[must_use]
    pub fn new(http: Arc<SourceClient>, provider: Arc<dyn SourceProvider>) -> Self {
        Self { http, provider }
    }

    /// Resolve one descriptor into its direct download link.
    pub async fn fetch(&self, descriptor: &dyn Descriptor, trace: &Trace) -> Result<DirectLink> {
        trace.push(format!("- started direct link task for {}", descriptor.label()));
        let route = parse_route(descriptor.route_url())?;
        let url = self.provider.resolve_direct_link(&self.http, &route, trace).await?;
        trace.push("- direct link resolved");
        Ok(DirectLink { url })
    }
}

/// Structural well-formedness is all that can be checked up front; whether
/// the upstream still honors the route only the fetch itself can tell.
fn parse_route(raw: &str) -> Result<Url> {
    if raw.is_empty() {
        return Err(ResolutionError::invalid_input(
            "descriptor carries no download route",
        ));
    }
    Url::parse(raw).map_err(|e| {
        ResolutionError::invalid_input(format!("descriptor route is not a valid URL: {e}"))
    })
}
