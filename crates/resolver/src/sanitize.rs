// ABOUTME: Denylist sanitizer for untrusted video URL strings.
// ABOUTME: Removes script tags, javascript: schemes, and on*= handler fragments, then trims.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static JAVASCRIPT_SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on\w+=").unwrap());

/// Strips common script-injection vectors from a raw URL string.
///
/// This is a best-effort denylist, not an HTML parser. Encoded payloads
/// (`&#106;avascript:`, `%6Aavascript:` and the like) pass through untouched,
/// so the output is a reduced-risk URL candidate and never trusted HTML.
///
/// The removal passes repeat until nothing changes, which makes the function
/// idempotent even for payloads that reassemble after one pass
/// (`javajavascript:script:`).
pub fn sanitize_video_url(raw: &str) -> String {
    let mut current = strip_once(raw);
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(input: &str) -> String {
    let out = SCRIPT_TAG_RE.replace_all(input, "");
    let out = JAVASCRIPT_SCHEME_RE.replace_all(&out, "");
    let out = EVENT_HANDLER_RE.replace_all(&out, "");
    out.trim().to_string()
}
