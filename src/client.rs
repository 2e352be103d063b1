//! Client facade over the pipeline stages.
//!
//! Features:
//! - Every operation returns immediately with a [`ResolutionCall`] handle;
//!   the work runs on a spawned task
//! - One whole-call budget arms when the call starts; overruns deliver a
//!   [`ResolutionError::Timeout`] failure result, not a hang
//! - Cancellation through the handle suppresses delivery for that call
//!   only; concurrent calls never share fate
//! - Invalid input is caught before any network work and delivered as a
//!   failure result on the same channel as every other outcome

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::config::ResolutionConfig;
use crate::descriptor::{Descriptor, DirectLink, RouteDescriptor, StreamDescriptor};
use crate::error::{ResolutionError, Result};
use crate::http_client::SourceClient;
use crate::provider::{FileHostProvider, SourceProvider};
use crate::resolve::{DirectLinkResolver, RouteResolver, StreamResolver};
use crate::task::{TaskResult, Trace};

/// Lifecycle of one spawned call, as seen from its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// The worker task is still running.
    InFlight,
    /// The worker produced a result; [`ResolutionCall::join`] delivers it
    /// exactly once.
    Completed,
    /// Cancellation was requested before any result was produced; delivery
    /// is suppressed.
    Cancelled,
}

/// Handle to one in-flight resolution call.
///
/// Dropping the handle detaches the worker without cancelling it; whatever
/// result it produces is then discarded unobserved. To stop the work, call
/// [`cancel`](Self::cancel) first.
pub struct ResolutionCall<T> {
    handle: JoinHandle<Option<TaskResult<T>>>,
    cancel: CancellationToken,
    // Latched by the worker the moment a result is committed; lets `state`
    // tell a delivered call apart from a suppressed one.
    completed: Arc<AtomicBool>,
}

impl<T> ResolutionCall<T> {
    /// Request cancellation. The worker stops at its next await point and
    /// suppresses its result; in-flight network work is dropped. Idempotent,
    /// and a no-op once the worker has committed its result.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the worker task has stopped running, for any reason,
    /// including a suppressed result after [`cancel`](Self::cancel).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Current lifecycle state.
    ///
    /// Completion wins the race with cancellation: once the worker has
    /// committed its result, a late cancel request changes nothing and
    /// [`join`](Self::join) still delivers. `Cancelled` is only ever
    /// reported for calls whose delivery is actually suppressed.
    #[must_use]
    pub fn state(&self) -> CallState {
        if self.completed.load(Ordering::Acquire) {
            CallState::Completed
        } else if self.cancel.is_cancelled() {
            CallState::Cancelled
        } else if self.handle.is_finished() {
            CallState::Completed
        } else {
            CallState::InFlight
        }
    }

    /// Await the outcome. Consumes the handle, so a delivered result has
    /// exactly one owner.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Cancelled`] when the worker suppressed
    /// its result after a cancel request, and
    /// [`ResolutionError::ResolutionFailure`] if the worker task itself
    /// died.
    pub async fn join(self) -> Result<TaskResult<T>> {
        match self.handle.await {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(ResolutionError::Cancelled),
            Err(err) if err.is_cancelled() => Err(ResolutionError::Cancelled),
            Err(err) => Err(ResolutionError::failure(format!("worker task died: {err}"))),
        }
    }
}

/// Entry point for the resolution pipeline.
///
/// Cheap to share: the HTTP pool and provider are reference-counted, and
/// every call gets its own task, trace and budget. Must be used inside a
/// Tokio runtime.
pub struct ResolutionClient {
    http: Arc<SourceClient>,
    provider: Arc<dyn SourceProvider>,
}

impl ResolutionClient {
    /// Client over the default file-host provider.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ResolutionFailure`] when the HTTP client
    /// cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_provider(Arc::new(FileHostProvider::new()))
    }

    /// Client over a custom upstream adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::ResolutionFailure`] when the HTTP client
    /// cannot be built.
    pub fn with_provider(provider: Arc<dyn SourceProvider>) -> Result<Self> {
        Ok(Self { http: Arc::new(SourceClient::new()?), provider })
    }

    /// Start a route discovery call.
    pub fn fetch_routes(
        &self,
        url: &str,
        config: &ResolutionConfig,
    ) -> ResolutionCall<Vec<RouteDescriptor>> {
        let trace = Trace::new();
        match self.admit(url) {
            Ok(source) => {
                let resolver =
                    RouteResolver::new(Arc::clone(&self.http), Arc::clone(&self.provider));
                let work_trace = trace.clone();
                spawn_call(config.timeout(), trace, async move {
                    resolver.fetch(&source, &work_trace).await
                })
            }
            Err(error) => reject(error, trace),
        }
    }

    /// Start a stream resolution call.
    pub fn fetch_streams(
        &self,
        url: &str,
        config: &ResolutionConfig,
    ) -> ResolutionCall<Vec<StreamDescriptor>> {
        let trace = Trace::new();
        match self.admit(url) {
            Ok(source) => {
                let resolver =
                    StreamResolver::new(Arc::clone(&self.http), Arc::clone(&self.provider));
                let call_config = config.clone();
                let work_trace = trace.clone();
                spawn_call(config.timeout(), trace, async move {
                    resolver.fetch(&source, &call_config, &work_trace).await
                })
            }
            Err(error) => reject(error, trace),
        }
    }

    /// Start a direct-link call for a previously fetched descriptor.
    ///
    /// The descriptor is snapshotted here; mutating or dropping the
    /// original afterwards cannot affect the call.
    pub fn fetch_direct_link(
        &self,
        descriptor: &dyn Descriptor,
        config: &ResolutionConfig,
    ) -> ResolutionCall<DirectLink> {
        let trace = Trace::new();
        let resolver = DirectLinkResolver::new(Arc::clone(&self.http), Arc::clone(&self.provider));
        let snapshot = DescriptorSnapshot {
            route_url: descriptor.route_url().to_string(),
            label: descriptor.label().to_string(),
        };
        let work_trace = trace.clone();
        spawn_call(config.timeout(), trace, async move {
            resolver.fetch(&snapshot, &work_trace).await
        })
    }

    /// Validate a raw source URL and check that the provider claims it.
    fn admit(&self, raw: &str) -> Result<Url> {
        let source = parse_source_url(raw)?;
        if !self.provider.matches(&source) {
            return Err(ResolutionError::invalid_input(format!(
                "provider '{}' does not handle host {}",
                self.provider.name(),
                source.host_str().unwrap_or("<none>")
            )));
        }
        Ok(source)
    }
}

/// Owned copy of a caller's descriptor, taken before the call starts.
struct DescriptorSnapshot {
    route_url: String,
    label: String,
}

impl Descriptor for DescriptorSnapshot {
    fn route_url(&self) -> &str {
        &self.route_url
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Spawn one call worker: the work future raced against the budget and the
/// cancel token. Exactly one `TaskResult` comes out unless cancellation
/// suppresses it.
fn spawn_call<T, Fut>(timeout: Duration, trace: Trace, work: Fut) -> ResolutionCall<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let guard = cancel.clone();
    let completed = Arc::new(AtomicBool::new(false));
    let latch = Arc::clone(&completed);
    let handle = tokio::spawn(async move {
        tokio::select! {
            // Checked first so a cancel that lands between polls wins even
            // against work that is ready.
            biased;
            () = guard.cancelled() => {
                trace.push("- cancelled; result suppressed");
                debug!("resolution call cancelled");
                None
            }
            outcome = time::timeout(timeout, work) => {
                latch.store(true, Ordering::Release);
                Some(match outcome {
                    Ok(Ok(payload)) => TaskResult::success(payload, trace.render()),
                    Ok(Err(error)) => {
                        trace.push(format!("- task failed: {error}"));
                        TaskResult::failure(error, trace.render())
                    }
                    Err(_) => {
                        trace.push(format!(
                            "- missed the {} ms budget; in-flight work dropped",
                            timeout.as_millis()
                        ));
                        TaskResult::failure(
                            ResolutionError::Timeout { limit: timeout },
                            trace.render(),
                        )
                    }
                })
            }
        }
    });
    ResolutionCall { handle, cancel, completed }
}

/// A call that was rejected before its worker had anything to do. Still
/// delivered through the normal channel so callers have one code path.
fn reject<T: Send + 'static>(error: ResolutionError, trace: Trace) -> ResolutionCall<T> {
    trace.push(format!("- rejected before start: {error}"));
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(async move { Some(TaskResult::failure(error, trace.render())) });
    // The rejection result exists from the start and ignores the token, so
    // the call is born completed.
    ResolutionCall { handle, cancel, completed: Arc::new(AtomicBool::new(true)) }
}

fn parse_source_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ResolutionError::invalid_input("URL is empty"));
    }
    let url = Url::parse(trimmed)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ResolutionError::invalid_input(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ResolutionError::invalid_input("URL has no host"));
    }
    Ok(url)
}
