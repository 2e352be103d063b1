//! HTTP layer shared by every provider call.
//!
//! Features:
//! - One pooled `reqwest` client per [`ResolutionClient`](crate::ResolutionClient)
//! - Browser-grade defaults: desktop user agent, cookies, compression
//! - Connect timeout only; the whole-call budget lives in the facade

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use crate::error::{ResolutionError, Result};
use crate::task::Trace;

/// Desktop browser user agent; file hosts gate their download tables on it.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Redirect hops allowed before a fetch is abandoned.
const MAX_REDIRECTS: usize = 10;

/// Budget for the TCP/TLS handshake alone. Kept below the smallest call
/// budget anyone is likely to configure so connect stalls surface as
/// failures, not as the call timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// Idle connections kept around per host for the paced resolution pass.
const POOL_IDLE_PER_HOST: usize = 8;

/// Pooled HTTP client behind all three pipeline stages.
///
/// Carries no per-request timeout on purpose: total time is governed by the
/// call budget in the facade, and a second layer of deadlines here would
/// just race it.
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Build the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ResolutionFailure`] when the TLS backend
    /// cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .use_rustls_tls()
            .cookie_store(true)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_max_idle_per_host(POOL_IDLE_PER_HOST)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self { client })
    }

    /// GET a page and hand back its body text.
    ///
    /// Non-2xx statuses are errors here: every page this pipeline fetches
    /// is one it expects to scrape, so an error page is never useful.
    pub async fn fetch_html(&self, url: &Url, trace: &Trace) -> Result<String> {
        trace.push(format!("- fetching {url}"));
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            trace.push(format!("- upstream answered {status}"));
            return Err(ResolutionError::failure(format!(
                "upstream answered {status} for {url}"
            )));
        }
        let body = response.text().await?;
        trace.push(format!("- page fetched ({} bytes)", body.len()));
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_offline() {
        assert!(SourceClient::new().is_ok());
    }

    #[tokio::test]
    async fn refused_connection_reports_failure_not_timeout() {
        let client = SourceClient::new().unwrap();
        let trace = Trace::new();
        // Bind then drop a listener to get a port that is really closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/page")).unwrap();
        let err = client.fetch_html(&url, &trace).await.unwrap_err();
        assert!(matches!(err, ResolutionError::ResolutionFailure { .. }));
        assert!(trace.render().contains("- fetching http://127.0.0.1:"));
    }
}
