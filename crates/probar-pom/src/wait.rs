//! Readiness polling.
//!
//! Pages and regions share one primitive: [`wait_until`] evaluates an async
//! predicate until it returns `true`, treating the error kinds in
//! [`WaitOptions::ignored`] as "not yet" and propagating everything else.
//! Between attempts the task sleeps on the tokio timer, so other work on
//! the runtime keeps running. The deadline is checked against a monotonic
//! clock after every attempt.

use crate::result::{ErrorKind, PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for load waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Wait timeout, polling interval and the errors that mean "not yet"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Error kinds treated as a falsy attempt instead of a failure
    pub ignored: HashSet<ErrorKind>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            ignored: [ErrorKind::NoSuchElement, ErrorKind::StaleElement]
                .into_iter()
                .collect(),
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Also treat `kind` as a transient error
    #[must_use]
    pub fn ignoring(mut self, kind: ErrorKind) -> Self {
        let _ = self.ignored.insert(kind);
        self
    }

    /// Propagate every error, including missing and stale elements
    #[must_use]
    pub fn ignoring_nothing(mut self) -> Self {
        self.ignored.clear();
        self
    }

    /// Whether errors of `kind` are swallowed while polling
    #[must_use]
    pub fn ignores(&self, kind: ErrorKind) -> bool {
        self.ignored.contains(&kind)
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of predicate evaluations
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a wait result
    #[must_use]
    pub fn new(elapsed: Duration, attempts: u32, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            attempts,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// POLLER
// =============================================================================

/// Poll `predicate` until it yields `true` or the timeout elapses.
///
/// The predicate is always evaluated at least once, so a zero timeout still
/// succeeds for an already-true predicate. On timeout the error carries the
/// elapsed time and the last ignored error, if any.
///
/// # Errors
///
/// [`PomError::Timeout`] when the budget runs out, or the first predicate
/// error whose kind is not in [`WaitOptions::ignored`].
pub async fn wait_until<F, Fut>(
    options: &WaitOptions,
    waited_for: &str,
    mut predicate: F,
) -> PomResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PomResult<bool>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut attempts = 0_u32;
    let mut last_error: Option<PomError> = None;

    loop {
        attempts += 1;
        match predicate().await {
            Ok(true) => {
                let elapsed = start.elapsed();
                tracing::debug!(waited_for, attempts, ?elapsed, "wait satisfied");
                return Ok(WaitResult::new(elapsed, attempts, waited_for));
            }
            Ok(false) => {
                tracing::trace!(waited_for, attempts, "not ready");
            }
            Err(err) if options.ignores(err.kind()) => {
                tracing::trace!(waited_for, attempts, error = %err, "ignored error while waiting");
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            tracing::warn!(waited_for, attempts, ?elapsed, "wait timed out");
            return Err(PomError::Timeout {
                elapsed,
                waited_for: waited_for.to_string(),
                last_error: last_error.map(Box::new),
            });
        }
        tokio::time::sleep(options.poll_interval().min(timeout - elapsed)).await;
    }
}

// =============================================================================
// TESTS
// =============================================================================
