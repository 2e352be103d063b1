//! Call outcomes and the per-call diagnostic trace.
//!
//! Features:
//! - [`TaskResult`] delivers success and failure on one channel, never both
//! - [`Trace`] records timestamped progress lines, cheap to clone and share
//!   across the async stages of a single call
//! - Trace entries mirror into `tracing` at debug level for live observation

use std::fmt::Write as _;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tracing::debug;

use crate::error::ResolutionError;

/// Thread-safe recorder of diagnostic lines for one resolution call.
///
/// Every stage of a call appends to the same buffer; clones share it. Each
/// entry is written under a local-time header so the final transcript reads
/// as a timeline:
///
/// ```text
/// 4:12:09 PM
/// - started route discovery
///
/// 4:12:10 PM
/// - page fetched (48211 bytes)
/// ```
#[derive(Debug, Clone, Default)]
pub struct Trace {
    buf: Arc<Mutex<String>>,
}

impl Trace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry under a timestamp header.
    pub fn push(&self, entry: impl AsRef<str>) {
        let entry = entry.as_ref();
        debug!("{entry}");
        let stamp = Local::now().format("%-I:%M:%S %p");
        let mut buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        // Writing to a String cannot fail.
        let _ = write!(buf, "{stamp}\n{entry}\n\n");
    }

    /// Snapshot the transcript accumulated so far.
    #[must_use]
    pub fn render(&self) -> String {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Outcome of one asynchronous resolution call.
///
/// Exactly one of payload and error is present, by construction. The
/// diagnostic trace is always attached; on a clean immediate failure it may
/// be short, but it is never absent.
#[derive(Debug, Clone)]
pub struct TaskResult<T> {
    outcome: Result<T, ResolutionError>,
    trace: String,
}

impl<T> TaskResult<T> {
    #[must_use]
    pub fn success(payload: T, trace: String) -> Self {
        Self { outcome: Ok(payload), trace }
    }

    #[must_use]
    pub fn failure(error: ResolutionError, trace: String) -> Self {
        Self { outcome: Err(error), trace }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The payload, when the call succeeded.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// The error, when the call failed.
    #[must_use]
    pub fn error(&self) -> Option<&ResolutionError> {
        self.outcome.as_ref().err()
    }

    /// The diagnostic transcript recorded while the call ran.
    #[must_use]
    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// Unwrap into a plain `Result`, dropping the trace.
    pub fn into_result(self) -> Result<T, ResolutionError> {
        self.outcome
    }

    /// Unwrap into the outcome and the trace it was recorded under.
    pub fn into_parts(self) -> (Result<T, ResolutionError>, String) {
        (self.outcome, self.trace)
    }
}
