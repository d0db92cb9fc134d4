//! Result and error types for page objects.

use std::time::Duration;
use thiserror::Error;

/// Result type for page object operations
pub type PomResult<T> = Result<T, PomError>;

/// Errors that can occur while building, opening or querying page objects
#[derive(Debug, Error)]
pub enum PomError {
    /// A `{name}` placeholder in a URL template had no matching parameter
    #[error("Missing URL parameter `{name}` for template {template:?}")]
    MissingUrlParameter {
        /// Placeholder name
        name: String,
        /// Template being resolved
        template: String,
    },

    /// URL could not be parsed or joined
    #[error("Invalid URL {url:?}: {message}")]
    InvalidUrl {
        /// Offending URL or template
        url: String,
        /// Error message
        message: String,
    },

    /// API used in a way that cannot succeed
    #[error("Usage error: {message}")]
    Usage {
        /// Error message
        message: String,
    },

    /// A `loaded` predicate never became true within its budget
    #[error(
        "Timed out after {}ms waiting for {waited_for}{}",
        .elapsed.as_millis(),
        last_error_suffix(.last_error)
    )]
    Timeout {
        /// Time spent polling
        elapsed: Duration,
        /// Description of what was waited for
        waited_for: String,
        /// Last ignored error observed while polling
        last_error: Option<Box<PomError>>,
    },

    /// No element matched a locator
    #[error("No element matching {locator}")]
    NoSuchElement {
        /// Locator description
        locator: String,
    },

    /// Element reference no longer points at a live node
    #[error("Stale element reference: {element}")]
    StaleElement {
        /// Element identifier
        element: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Any other driver or session failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

fn last_error_suffix(last_error: &Option<Box<PomError>>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(" (last error: {e})"))
        .unwrap_or_default()
}

/// Fieldless classification of [`PomError`], used by wait ignore sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// [`PomError::MissingUrlParameter`]
    MissingUrlParameter,
    /// [`PomError::InvalidUrl`]
    InvalidUrl,
    /// [`PomError::Usage`]
    Usage,
    /// [`PomError::Timeout`]
    Timeout,
    /// [`PomError::NoSuchElement`]
    NoSuchElement,
    /// [`PomError::StaleElement`]
    StaleElement,
    /// [`PomError::Navigation`]
    Navigation,
    /// [`PomError::Driver`]
    Driver,
    /// [`PomError::Config`]
    Config,
    /// [`PomError::Io`]
    Io,
    /// [`PomError::Yaml`]
    Yaml,
}

impl PomError {
    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingUrlParameter { .. } => ErrorKind::MissingUrlParameter,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::Usage { .. } => ErrorKind::Usage,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::NoSuchElement { .. } => ErrorKind::NoSuchElement,
            Self::StaleElement { .. } => ErrorKind::StaleElement,
            Self::Navigation { .. } => ErrorKind::Navigation,
            Self::Driver { .. } => ErrorKind::Driver,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Yaml(_) => ErrorKind::Yaml,
        }
    }

    /// Create a usage error
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
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

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a no-such-element error
    #[must_use]
    pub fn no_such_element(locator: impl std::fmt::Display) -> Self {
        Self::NoSuchElement {
            locator: locator.to_string(),
        }
    }

    /// Create a stale-element error
    #[must_use]
    pub fn stale_element(element: impl Into<String>) -> Self {
        Self::StaleElement {
            element: element.into(),
        }
    }
}
