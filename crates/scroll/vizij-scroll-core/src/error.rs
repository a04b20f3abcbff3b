//! Error types for scroll bindings.

use thiserror::Error;

/// Configuration problems. Detected while building a binding; construction
/// fails as a whole and no partial tree is kept.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid over {value}: must be a positive finite number")]
    InvalidGlobalOver { value: String },

    #[error("invalid over {value} for '{property}' on '{selector}': must be a positive finite number")]
    InvalidOver {
        selector: String,
        property: String,
        value: f64,
    },

    #[error("malformed tween for '{property}' on '{selector}': {reason}")]
    MalformedTween {
        selector: String,
        property: String,
        reason: String,
    },

    #[error("malformed properties for '{selector}': {reason}")]
    MalformedSelector { selector: String, reason: String },

    #[error("malformed options: {reason}")]
    MalformedOptions { reason: String },

    #[error("invalid throttle {field}: {value} (must be > 0)")]
    InvalidThrottle { field: &'static str, value: u32 },

    #[error("trailingMs {trailing_ms} must be greater than windowMs {window_ms}")]
    ThrottleOrder { window_ms: u32, trailing_ms: u32 },

    #[error("non-finite {endpoint} {value} for '{property}' on '{selector}'")]
    InvalidEndpoint {
        selector: String,
        property: String,
        endpoint: &'static str,
        value: f64,
    },

    #[error("selector '{selector}' could not be resolved: {reason}")]
    Selector { selector: String, reason: String },

    #[error("no root element given and the host has no default root")]
    MissingRoot,
}

impl ConfigError {
    /// Selector the error refers to, if any.
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::InvalidOver { selector, .. }
            | Self::MalformedTween { selector, .. }
            | Self::InvalidEndpoint { selector, .. }
            | Self::MalformedSelector { selector, .. }
            | Self::Selector { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// Property the error refers to, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::InvalidOver { property, .. }
            | Self::MalformedTween { property, .. }
            | Self::InvalidEndpoint { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Failures reported by host capabilities at runtime. Not recovered by the core;
/// they propagate out of [`crate::apply()`] and frame callbacks.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HostError {
    #[error("failed to write '{property}': {reason}")]
    Write { property: String, reason: String },

    #[error("query '{selector}' failed: {reason}")]
    Query { selector: String, reason: String },

    #[error("binding is no longer active")]
    Detached,
}
