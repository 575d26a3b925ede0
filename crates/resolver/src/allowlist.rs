// ABOUTME: Host allowlist used as the security gate before any URL reaches an iframe.
// ABOUTME: Loads the builtin domain list from embedded JSON; callers may inject their own.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use url::Url;

use crate::error::EmbedError;
use crate::providers::has_video_file_extension;

/// Embedded JSON array with the default allowed video domains.
const BUILTIN_DOMAINS_JSON: &str = include_str!("../data/allowed_domains.json");

/// Returns the builtin allowed domains.
///
/// # Panics
///
/// Panics if the embedded JSON is malformed.
pub fn builtin_domains() -> Vec<String> {
    serde_json::from_str(BUILTIN_DOMAINS_JSON).expect("failed to parse builtin allowed domains")
}

/// A set of allowed video-hosting domains.
///
/// A host is allowed when it *contains* one of the domains, so
/// `www.youtube.com` and `m.youtube.com` both pass for `youtube.com`.
#[derive(Debug, Clone)]
pub struct Allowlist {
    domains: Vec<String>,
    matcher: AhoCorasick,
}

impl Allowlist {
    /// Builds an allowlist from the given domains.
    /// Domains are trimmed and lowercased; blank entries are dropped.
    pub fn new<I, S>(domains: I) -> Result<Self, EmbedError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: Vec<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        let matcher = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&domains)
            .map_err(EmbedError::config)?;

        Ok(Self { domains, matcher })
    }

    /// The normalized domains in this allowlist.
    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Returns true if the host contains an allowed domain.
    pub fn allows_host(&self, host: &str) -> bool {
        self.matcher.is_match(host)
    }

    /// Decides whether `raw` may be embedded at all.
    ///
    /// - Absolute http(s) URL: allowed if its host is on the list, or its path
    ///   ends in a video file extension.
    /// - Absolute URL with any other scheme: rejected.
    /// - Not parseable as an absolute URL: allowed only if it ends in a video
    ///   file extension.
    pub fn is_allowed(&self, raw: &str) -> bool {
        match Url::parse(raw) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    return false;
                }
                let host_allowed = url.host_str().is_some_and(|host| self.allows_host(host));
                host_allowed || has_video_file_extension(url.path())
            }
            Err(_) => has_video_file_extension(raw),
        }
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(builtin_domains()).expect("builtin allowed domains form a valid matcher")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_domains_load() {
        let domains = builtin_domains();
        assert_eq!(domains.len(), 7);
        assert!(domains.contains(&"youtu.be".to_string()));
        assert!(domains.contains(&"tiktok.com".to_string()));
    }

    #[test]
    fn allows_known_platforms() {
        let list = Allowlist::default();
        assert!(list.is_allowed("https://www.tiktok.com/@user/video/123"));
        assert!(list.is_allowed("https://www.youtube.com/watch?v=abc"));
        assert!(list.is_allowed("https://youtu.be/abc"));
        assert!(list.is_allowed("https://player.vimeo.com/video/1"));
        assert!(list.is_allowed("http://m.facebook.com/watch"));
    }

    #[test]
    fn rejects_other_hosts() {
        let list = Allowlist::default();
        assert!(!list.is_allowed("https://evil.com/video"));
        assert!(!list.is_allowed("https://example.com/youtube.com/watch?v=x"));
    }

    #[test]
    fn host_match_is_substring() {
        let list = Allowlist::default();
        assert!(list.is_allowed("https://notyoutube.com.example.net/x"));
    }

    #[test]
    fn direct_files_allowed_on_any_host() {
        let list = Allowlist::default();
        assert!(list.is_allowed("https://cdn.example.com/clip.mp4"));
        assert!(list.is_allowed("https://cdn.example.com/clip.webm?sig=abc"));
        assert!(list.is_allowed("/media/intro.mov"));
        assert!(!list.is_allowed("/media/intro.html"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        let list = Allowlist::default();
        assert!(!list.is_allowed("javascript://youtube.com/%0aalert(1)"));
        assert!(!list.is_allowed("javascript:alert(1)//clip.mp4"));
        assert!(!list.is_allowed("data:video/mp4;base64,AAAA.mp4"));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        let list = Allowlist::default();
        assert!(!list.is_allowed("not a url at all"));
        assert!(!list.is_allowed(""));
    }

    #[test]
    fn custom_domains_are_normalized() {
        let list = Allowlist::new(["  Example.COM ", "", "   "]).unwrap();
        assert_eq!(list.domains(), &["example.com".to_string()]);
        assert!(list.is_allowed("https://video.example.com/watch/1"));
        assert!(!list.is_allowed("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn empty_allowlist_only_allows_direct_files() {
        let list = Allowlist::new(Vec::<String>::new()).unwrap();
        assert!(list.is_empty());
        assert!(!list.is_allowed("https://www.youtube.com/watch?v=abc"));
        assert!(list.is_allowed("https://cdn.example.com/clip.mp4"));
    }
}
