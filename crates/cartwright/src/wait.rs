//! Wait Mechanisms
//!
//! Bounded condition polling. A probe runs at fixed intervals until it
//! yields a value or the policy timeout elapses; the caller gets an explicit
//! [`WaitOutcome`] and decides whether a timeout is a failure or an expected
//! negative-path signal.

use crate::driver::{ElementState, SelectOption};
use crate::result::{SuiteError, SuiteResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT POLICY
// =============================================================================

/// Timeout and polling interval for condition waits
///
/// Invariant: `timeout > poll_interval > 0`. Construct through
/// [`WaitPolicy::new`]; deserialization enforces the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WaitPolicyRepr", into = "WaitPolicyRepr")]
pub struct WaitPolicy {
    timeout_ms: u64,
    poll_interval_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitPolicy {
    /// Create a policy, rejecting pairs that break the invariant
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> SuiteResult<Self> {
        if poll_interval_ms == 0 {
            return Err(SuiteError::configuration(
                "wait poll interval must be greater than zero",
            ));
        }
        if timeout_ms <= poll_interval_ms {
            return Err(SuiteError::configuration(format!(
                "wait timeout ({timeout_ms}ms) must exceed poll interval ({poll_interval_ms}ms)"
            )));
        }
        Ok(Self {
            timeout_ms,
            poll_interval_ms,
        })
    }

    /// Same polling interval with a different timeout
    pub fn with_timeout(self, timeout_ms: u64) -> SuiteResult<Self> {
        Self::new(timeout_ms, self.poll_interval_ms)
    }

    /// Timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Poll interval in milliseconds
    #[must_use]
    pub const fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
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

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct WaitPolicyRepr {
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl TryFrom<WaitPolicyRepr> for WaitPolicy {
    type Error = SuiteError;

    fn try_from(repr: WaitPolicyRepr) -> Result<Self, Self::Error> {
        Self::new(repr.timeout_ms, repr.poll_interval_ms)
    }
}

impl From<WaitPolicy> for WaitPolicyRepr {
    fn from(policy: WaitPolicy) -> Self {
        Self {
            timeout_ms: policy.timeout_ms,
            poll_interval_ms: policy.poll_interval_ms,
        }
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

/// Predicate evaluated against the first element a locator matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// At least one match exists
    Present,
    /// The match is rendered
    Visible,
    /// The match is visible and enabled
    Clickable,
    /// Nothing matches, or the match is hidden
    Invisible,
    /// Nothing matches, or the match is hidden or disabled
    NotClickable,
    /// The match's trimmed text equals the string
    TextEquals(String),
    /// The match's text contains the string
    TextContains(String),
    /// The match's form value equals the string
    ValueEquals(String),
    /// The match is a checkbox/radio in the given state
    Checked(bool),
    /// The match is a select offering the option
    HasOption(SelectOption),
}

impl Condition {
    /// Evaluate against a probed element, `None` meaning nothing matched
    #[must_use]
    pub fn holds(&self, element: Option<&ElementState>) -> bool {
        match (self, element) {
            (Self::Invisible, None) | (Self::NotClickable, None) => true,
            (_, None) => false,
            (Self::Present, Some(_)) => true,
            (Self::Visible, Some(e)) => e.visible,
            (Self::Clickable, Some(e)) => e.is_clickable(),
            (Self::Invisible, Some(e)) => !e.visible,
            (Self::NotClickable, Some(e)) => !e.is_clickable(),
            (Self::TextEquals(text), Some(e)) => e.text.trim() == text,
            (Self::TextContains(text), Some(e)) => e.text.contains(text.as_str()),
            (Self::ValueEquals(value), Some(e)) => e.value.as_deref() == Some(value.as_str()),
            (Self::Checked(state), Some(e)) => e.selected == *state,
            (Self::HasOption(option), Some(e)) => e.has_option(option),
        }
    }

    /// Whether the condition can hold with no element present
    #[must_use]
    pub const fn accepts_absence(&self) -> bool {
        matches!(self, Self::Invisible | Self::NotClickable)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => f.write_str("present"),
            Self::Visible => f.write_str("visible"),
            Self::Clickable => f.write_str("clickable"),
            Self::Invisible => f.write_str("invisible"),
            Self::NotClickable => f.write_str("not clickable"),
            Self::TextEquals(t) => write!(f, "text equal to '{t}'"),
            Self::TextContains(t) => write!(f, "text containing '{t}'"),
            Self::ValueEquals(v) => write!(f, "value equal to '{v}'"),
            Self::Checked(true) => f.write_str("checked"),
            Self::Checked(false) => f.write_str("unchecked"),
            Self::HasOption(o) => write!(f, "option with {o}"),
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Result of a bounded wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The probe succeeded
    Ready(T),
    /// The timeout elapsed first
    TimedOut {
        /// Time spent polling
        elapsed: Duration,
    },
}

impl<T> WaitOutcome<T> {
    /// Whether the wait succeeded
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Ready value, if any
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// Convert a timeout into the given error
    pub fn or_else_err(self, err: impl FnOnce() -> SuiteError) -> SuiteResult<T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::TimedOut { .. } => Err(err()),
        }
    }
}

/// Run `probe` every poll interval until it yields `Some` or the timeout
/// elapses. Probe errors propagate immediately.
pub async fn poll_until<T, F, Fut>(policy: WaitPolicy, mut probe: F) -> SuiteResult<WaitOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SuiteResult<Option<T>>>,
{
    let start = Instant::now();
    let timeout = policy.timeout();
    loop {
        if let Some(value) = probe().await? {
            return Ok(WaitOutcome::Ready(value));
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(WaitOutcome::TimedOut { elapsed });
        }
        let remaining = timeout - elapsed;
        tokio::time::sleep(policy.poll_interval().min(remaining)).await;
    }
}
