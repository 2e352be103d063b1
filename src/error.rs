//! Error taxonomy for the resolution pipeline.
//!
//! Every failure a call can produce is folded into one of four kinds so
//! callers can branch on intent (bad input, upstream trouble, budget blown,
//! cancelled) without string matching. Errors never escape as panics; they
//! are delivered inside a failure [`TaskResult`](crate::TaskResult) on the
//! same channel as successes.

use std::time::Duration;

use thiserror::Error;

/// Failure kinds produced by resolution calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The caller handed us something unusable: a malformed source URL, a
    /// descriptor with no route, or a zero timeout. Detected before any
    /// network work starts.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What exactly was wrong with the input.
        reason: String,
    },

    /// The upstream was unreachable, answered with an error status, or its
    /// page no longer matches the wire format the provider expects.
    #[error("resolution failed: {reason}")]
    ResolutionFailure {
        /// What went wrong, including the upstream cause chain when known.
        reason: String,
    },

    /// The whole-call time budget elapsed before the operation finished.
    /// In-flight network work was dropped.
    #[error("timed out after {limit:?}")]
    Timeout {
        /// The budget that was exceeded.
        limit: Duration,
    },

    /// The call was cancelled through its handle; no result was delivered.
    #[error("cancelled before completion")]
    Cancelled,
}

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, ResolutionError>;

impl ResolutionError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Self::ResolutionFailure { reason: reason.into() }
    }

    /// Short kind name for log lines and UI headers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "InvalidInput",
            Self::ResolutionFailure { .. } => "ResolutionFailure",
            Self::Timeout { .. } => "Timeout",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl From<reqwest::Error> for ResolutionError {
    /// Transport errors fold into `ResolutionFailure` with the full cause
    /// chain rendered; reqwest tends to bury the interesting part (dns,
    /// connection refused, tls) two sources deep.
    fn from(err: reqwest::Error) -> Self {
        let mut reason = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::ResolutionFailure { reason }
    }
}

impl From<url::ParseError> for ResolutionError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidInput { reason: format!("URL is invalid: {err}") }
    }
}
