// ABOUTME: Configuration for the Resolver including ResolverOptions and ResolverBuilder.
// ABOUTME: Options deserialize from JSON with per-field defaults; the builder offers a fluent API.

use serde::Deserialize;

use crate::allowlist::builtin_domains;
use crate::error::EmbedError;
use crate::models::EmbedParameters;
use crate::resolver::Resolver;

/// Configuration options for a [`Resolver`].
///
/// ```json
/// { "allowed_domains": ["youtube.com", "vimeo.com"], "default_params": { "autoplay": true } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    pub allowed_domains: Vec<String>,
    pub default_params: EmbedParameters,
    pub allow_full_screen: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            allowed_domains: builtin_domains(),
            default_params: EmbedParameters::default(),
            allow_full_screen: true,
        }
    }
}

impl ResolverOptions {
    /// Parses options from a JSON document. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EmbedError> {
        serde_json::from_str(json).map_err(EmbedError::config)
    }
}

/// Builder for constructing Resolver instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ResolverBuilder {
    opts: ResolverOptions,
}

impl ResolverBuilder {
    /// Create a new ResolverBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: ResolverOptions::default(),
        }
    }

    /// Start from existing options.
    pub fn from_options(opts: ResolverOptions) -> Self {
        Self { opts }
    }

    /// Replace the allowed domain list.
    pub fn allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.allowed_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Add one domain to the allowed list.
    pub fn allow_domain(mut self, domain: impl Into<String>) -> Self {
        self.opts.allowed_domains.push(domain.into());
        self
    }

    /// Set the playback flags used when a call does not pass its own.
    pub fn default_params(mut self, params: EmbedParameters) -> Self {
        self.opts.default_params = params;
        self
    }

    /// Set whether generated iframe attributes allow fullscreen.
    pub fn allow_full_screen(mut self, allow: bool) -> Self {
        self.opts.allow_full_screen = allow;
        self
    }

    /// Build the Resolver with the configured options.
    pub fn build(self) -> Result<Resolver, EmbedError> {
        Resolver::new(self.opts)
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
