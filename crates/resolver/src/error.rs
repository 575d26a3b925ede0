// ABOUTME: Error types for the gated embed pipeline and resolver configuration.
// ABOUTME: Provides EmbedError with Empty, NotAllowed, and Config variants.

use std::fmt;
use thiserror::Error;

/// Errors returned by `Resolver::resolve` and configuration loading.
///
/// The free functions in the crate root never fail; they degrade to a
/// passthrough or `false` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// Nothing was left of the input after sanitizing.
    #[error("video url is empty")]
    Empty,

    /// The URL's host is not on the allowlist.
    #[error("video url is not from an allowed platform: {0}")]
    NotAllowed(String),

    /// Resolver options could not be decoded.
    #[error("invalid resolver config: {0}")]
    Config(String),
}

impl EmbedError {
    /// Creates a NotAllowed error for the given URL.
    pub fn not_allowed(url: impl Into<String>) -> Self {
        EmbedError::NotAllowed(url.into())
    }

    /// Creates a Config error from an underlying decode error.
    pub fn config(err: impl fmt::Display) -> Self {
        EmbedError::Config(err.to_string())
    }

    /// Returns true if this is a NotAllowed error.
    pub fn is_not_allowed(&self) -> bool {
        matches!(self, EmbedError::NotAllowed(_))
    }
}
