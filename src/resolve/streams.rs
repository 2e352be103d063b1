//! Stream resolution: discovery plus the paced resolution pass.

use std::sync::Arc;

use futures::future;
use tokio::time;
use url::Url;

use crate::config::ResolutionConfig;
use crate::descriptor::StreamDescriptor;
use crate::error::Result;
use crate::http_client::SourceClient;
use crate::provider::SourceProvider;
use crate::resolve::RouteResolver;
use crate::task::Trace;

/// Resolves the playable streams behind a source URL.
///
/// Runs route discovery first, then, unless the config skips it, waits out
/// the pacing gap and resolves every route's playable URL. The gap keeps
/// the burst of playback-page fetches from landing in the same instant as
/// discovery; rate-limiting hosts notice that pattern.
pub struct StreamResolver {
    routes: RouteResolver,
    http: Arc<SourceClient>,
    provider: Arc<dyn SourceProvider>,
}

impl StreamResolver {
    #[must_use]
    pub fn new(http: Arc<SourceClient>, provider: Arc<dyn SourceProvider>) -> Self {
        Self {
            routes: RouteResolver::new(Arc::clone(&http), Arc::clone(&provider)),
            http,
            provider,
        }
    }

    /// Resolve streams for `url`, in discovery order.
    ///
    /// Discovery failures short-circuit: the gap never runs and no
    /// resolution request is sent. In skip mode each stream reuses its
    /// route's own link as the playable URL, so URLs are never empty.
    pub async fn fetch(
        &self,
        url: &Url,
        config: &ResolutionConfig,
        trace: &Trace,
    ) -> Result<Vec<StreamDescriptor>> {
        trace.push("- started stream resolution");
        let routes = self.routes.fetch(url, trace).await?;

        if routes.is_empty() {
            trace.push("- nothing to resolve");
            return Ok(Vec::new());
        }
        if config.skip_resolution() {
            trace.push("- resolution pass skipped by config");
            return Ok(routes.into_iter().map(StreamDescriptor::from_route).collect());
        }

        if !config.gap().is_zero() {
            trace.push(format!(
                "- pacing for {} ms before the resolution pass",
                config.gap().as_millis()
            ));
            time::sleep(config.gap()).await;
        }

        trace.push(format!("- resolving {} route(s)", routes.len()));
        let passes = routes.iter().enumerate().map(|(position, route)| {
            self.provider.resolve_playback(&self.http, url, route, position, trace)
        });
        // Concurrent, but results come back in input order.
        let urls = future::try_join_all(passes).await?;

        let streams: Vec<_> = routes
            .into_iter()
            .zip(urls)
            .map(|(route, playable)| StreamDescriptor::resolved(route, playable))
            .collect();
        trace.push(format!("- resolved {} stream(s)", streams.len()));
        Ok(streams)
    }
}
