// ABOUTME: Video embed resolver library for embedguard.
// ABOUTME: Provides sanitizing, allowlist checks, provider classification, embed URLs, and iframe attributes.

//! Embedguard turns untrusted, user- or CMS-supplied video links into
//! provider embed URLs that are safe to put in an iframe.
//!
//! # Example
//!
//! ```
//! use embedguard_resolver::Resolver;
//!
//! let resolver = Resolver::default();
//! let embed = resolver
//!     .resolve("https://vimeo.com/76979871", None, "Product demo")
//!     .unwrap();
//! assert_eq!(
//!     embed.result.embed_url,
//!     "https://player.vimeo.com/video/76979871?muted=1&title=0&byline=0&portrait=0"
//! );
//! ```

pub mod allowlist;
pub mod attributes;
pub mod error;
pub mod models;
pub mod options;
pub mod providers;
pub mod resolver;
pub mod sanitize;

pub use allowlist::{builtin_domains, Allowlist};
pub use attributes::{secure_iframe_attributes, IframeAttributes};
pub use error::EmbedError;
pub use models::{EmbedParameters, EmbedResult, ResolvedEmbed, VideoProvider};
pub use options::{ResolverBuilder, ResolverOptions};
pub use providers::{build_embed_url, classify, has_video_file_extension, resolve_embed};
pub use resolver::Resolver;
pub use sanitize::sanitize_video_url;

// ----------------------------------------------------------------------------
// Default-configured entry points
// ----------------------------------------------------------------------------

use once_cell::sync::Lazy;

static DEFAULT_RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::default);

/// Returns true if the URL is from a builtin allowed platform or is a direct video file.
///
/// A URL that parses with a scheme other than `http` or `https` is rejected even
/// when its host is on the allowlist, so `ftp://youtube.com/x` is not allowed.
pub fn is_allowed_video_platform(raw: &str) -> bool {
    DEFAULT_RESOLVER.is_allowed(raw)
}

/// Builds an embed URL with explicit playback flags. Does not consult the allowlist.
pub fn get_video_embed_url(raw: &str, autoplay: bool, muted: bool, loop_playback: bool) -> String {
    build_embed_url(raw, &EmbedParameters::new(autoplay, muted, loop_playback))
}

/// Builds an embed URL with the default flags (muted only).
pub fn get_default_video_embed_url(raw: &str) -> String {
    build_embed_url(raw, &EmbedParameters::default())
}

/// Returns the fixed, hardened iframe attribute set with the given title.
pub fn get_secure_iframe_attributes(title: &str, allow_full_screen: bool) -> IframeAttributes {
    secure_iframe_attributes(title, allow_full_screen)
}
