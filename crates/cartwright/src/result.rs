//! Result and error types for cartwright.

use crate::locator::Locator;
use thiserror::Error;

/// Result type for cartwright operations
pub type SuiteResult<T> = Result<T, SuiteError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SuiteError {
    /// A wait condition did not hold within the policy timeout
    #[error("element {locator} not ready: expected {condition} within {timeout_ms}ms")]
    ElementNotReady {
        /// Locator that was polled
        locator: Locator,
        /// Rendered condition that never held
        condition: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// A workflow finished but its structural result did not hold
    #[error("{workflow} postcondition failed at {url}: expected {expected}, got {actual}")]
    PostconditionFailed {
        /// Workflow name
        workflow: &'static str,
        /// Expected state
        expected: String,
        /// Observed state
        actual: String,
        /// Browser URL when the check ran
        url: String,
    },

    /// Caller supplied an unrecognized or invalid value
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// More than one cart row carries the same product name
    #[error("product '{name}' appears {count} times in the cart; duplicate names are unsupported")]
    AmbiguousProduct {
        /// Product display name
        name: String,
        /// Number of matching rows
        count: usize,
    },

    /// The element vanished between resolution and interaction
    #[error("element {locator}[{index}] is no longer attached")]
    StaleElement {
        /// Locator of the element
        locator: Locator,
        /// Match index
        index: usize,
    },

    /// A select element has no matching option
    #[error("option {option} not found in {locator}")]
    OptionNotFound {
        /// Select element locator
        locator: Locator,
        /// Rendered option
        option: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Low-level driver failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SuiteError {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this error is a wait timeout
    #[must_use]
    pub const fn is_element_not_ready(&self) -> bool {
        matches!(self, Self::ElementNotReady { .. })
    }

    /// Whether this error is a failed workflow postcondition
    #[must_use]
    pub const fn is_postcondition_failed(&self) -> bool {
        matches!(self, Self::PostconditionFailed { .. })
    }

    /// Whether this error was raised before touching the browser
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
