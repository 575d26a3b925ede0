// ABOUTME: Resolver runs the gated embed pipeline: sanitize, allowlist, classify, build.
// ABOUTME: Holds an injected allowlist and default playback flags; immutable and shareable.

use tracing::warn;

use crate::allowlist::Allowlist;
use crate::attributes::{secure_iframe_attributes, IframeAttributes};
use crate::error::EmbedError;
use crate::models::{EmbedParameters, EmbedResult, ResolvedEmbed, VideoProvider};
use crate::options::{ResolverBuilder, ResolverOptions};
use crate::providers;
use crate::sanitize::sanitize_video_url;

/// Turns untrusted video links into embed URLs and iframe attributes.
#[derive(Debug, Clone)]
pub struct Resolver {
    allowlist: Allowlist,
    default_params: EmbedParameters,
    allow_full_screen: bool,
}

impl Resolver {
    /// Create a builder for configuring a Resolver.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Create a Resolver from options.
    pub fn new(opts: ResolverOptions) -> Result<Self, EmbedError> {
        Ok(Self {
            allowlist: Allowlist::new(&opts.allowed_domains)?,
            default_params: opts.default_params,
            allow_full_screen: opts.allow_full_screen,
        })
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn default_params(&self) -> EmbedParameters {
        self.default_params
    }

    pub fn sanitize(&self, raw: &str) -> String {
        sanitize_video_url(raw)
    }

    pub fn is_allowed(&self, raw: &str) -> bool {
        self.allowlist.is_allowed(raw)
    }

    pub fn classify(&self, raw: &str) -> VideoProvider {
        providers::classify(raw)
    }

    /// Builds the embed URL without the allowlist gate, falling back to the
    /// resolver's default flags when `params` is `None`.
    pub fn embed_url(&self, raw: &str, params: Option<&EmbedParameters>) -> EmbedResult {
        providers::resolve_embed(raw, params.unwrap_or(&self.default_params))
    }

    pub fn attributes(&self, title: &str) -> IframeAttributes {
        secure_iframe_attributes(title, self.allow_full_screen)
    }

    /// Full pipeline. A URL that fails the allowlist never reaches the builder.
    pub fn resolve(
        &self,
        raw: &str,
        params: Option<&EmbedParameters>,
        title: &str,
    ) -> Result<ResolvedEmbed, EmbedError> {
        let url = self.sanitize(raw);
        if url.is_empty() {
            return Err(EmbedError::Empty);
        }

        if !self.is_allowed(&url) {
            warn!(url = %url, "rejected video url from non-allowed platform");
            return Err(EmbedError::not_allowed(url));
        }

        Ok(ResolvedEmbed {
            result: self.embed_url(&url, params),
            attributes: self.attributes(title),
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            allowlist: Allowlist::default(),
            default_params: EmbedParameters::default(),
            allow_full_screen: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_allowed_youtube_link() {
        let resolved = Resolver::default()
            .resolve("https://youtu.be/abc123", None, "Intro")
            .unwrap();
        assert_eq!(resolved.result.provider, VideoProvider::YouTube);
        assert_eq!(
            resolved.result.embed_url,
            "https://www.youtube.com/embed/abc123?mute=1&rel=0&modestbranding=1"
        );
        assert_eq!(resolved.attributes.title, "Intro");
    }

    #[test]
    fn rejects_non_allowed_host() {
        let err = Resolver::default()
            .resolve("https://evil.com/video", None, "x")
            .unwrap_err();
        assert_eq!(err, EmbedError::NotAllowed("https://evil.com/video".to_string()));
    }

    #[test]
    fn empty_after_sanitizing_is_error() {
        let err = Resolver::default()
            .resolve("  <script>alert(1)</script> ", None, "x")
            .unwrap_err();
        assert_eq!(err, EmbedError::Empty);
    }

    #[test]
    fn sanitizes_before_gating() {
        let resolved = Resolver::default()
            .resolve("<script>alert(1)</script>https://vimeo.com/76979871", None, "x")
            .unwrap();
        assert_eq!(resolved.result.provider, VideoProvider::Vimeo);
    }

    #[test]
    fn explicit_params_override_defaults() {
        let resolver = Resolver::builder()
            .default_params(EmbedParameters::new(true, false, false))
            .build()
            .unwrap();
        let with_defaults = resolver.embed_url("https://vimeo.com/1", None);
        assert_eq!(
            with_defaults.embed_url,
            "https://player.vimeo.com/video/1?autoplay=1&title=0&byline=0&portrait=0"
        );
        let explicit = resolver.embed_url("https://vimeo.com/1", Some(&EmbedParameters::default()));
        assert_eq!(
            explicit.embed_url,
            "https://player.vimeo.com/video/1?muted=1&title=0&byline=0&portrait=0"
        );
    }

    #[test]
    fn fullscreen_option_flows_into_attributes() {
        let resolver = Resolver::builder().allow_full_screen(false).build().unwrap();
        assert!(!resolver.attributes("t").allow_full_screen);
    }

    #[test]
    fn resolver_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
    }
}
