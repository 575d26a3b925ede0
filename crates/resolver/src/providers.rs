// ABOUTME: Provider classification and embed URL construction for hosted video links.
// ABOUTME: An ordered rule table decides the provider; the first matching rule wins.

use tracing::debug;
use url::form_urlencoded;

use crate::models::{EmbedParameters, EmbedResult, VideoProvider};

/// File extensions treated as direct media sources (compared case-insensitively).
pub const VIDEO_FILE_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".ogg", ".mov", ".avi", ".mkv"];

const YOUTUBE_WATCH: &str = "youtube.com/watch";
const YOUTUBE_SHORT: &str = "youtu.be/";
const VIMEO: &str = "vimeo.com/";
const DAILYMOTION: &str = "dailymotion.com/video/";
const FACEBOOK: &str = "facebook.com/";
const INSTAGRAM_POST: &str = "instagram.com/p/";
const TIKTOK: &str = "tiktok.com/@";

/// One entry of the dispatch table.
///
/// `build` returning `None` means the identifier could not be extracted and the
/// raw URL passes through unchanged.
struct ProviderRule {
    provider: VideoProvider,
    matches: fn(&str) -> bool,
    build: fn(&str, &EmbedParameters) -> Option<String>,
}

/// Evaluated top to bottom. Order is significant: it breaks ties for URLs
/// that textually match more than one provider.
static PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        provider: VideoProvider::YouTube,
        matches: is_youtube,
        build: build_youtube,
    },
    ProviderRule {
        provider: VideoProvider::Vimeo,
        matches: is_vimeo,
        build: build_vimeo,
    },
    ProviderRule {
        provider: VideoProvider::Dailymotion,
        matches: is_dailymotion,
        build: build_dailymotion,
    },
    ProviderRule {
        provider: VideoProvider::FacebookVideo,
        matches: is_facebook_video,
        build: build_facebook,
    },
    ProviderRule {
        provider: VideoProvider::Instagram,
        matches: is_instagram_post,
        build: build_instagram,
    },
    ProviderRule {
        provider: VideoProvider::TikTok,
        matches: is_tiktok_video,
        build: build_tiktok,
    },
    ProviderRule {
        provider: VideoProvider::DirectFile,
        matches: has_video_file_extension,
        build: build_direct_file,
    },
];

fn find_rule(raw: &str) -> Option<&'static ProviderRule> {
    PROVIDER_RULES.iter().find(|rule| (rule.matches)(raw))
}

/// Classifies a raw URL by provider. Never fails; unmatched input is `Unknown`.
pub fn classify(raw: &str) -> VideoProvider {
    find_rule(raw)
        .map(|rule| rule.provider)
        .unwrap_or(VideoProvider::Unknown)
}

/// Builds the provider embed URL, or returns `raw` unchanged when no provider
/// matches or the video identifier cannot be extracted.
pub fn build_embed_url(raw: &str, params: &EmbedParameters) -> String {
    resolve_embed(raw, params).embed_url
}

/// Like [`build_embed_url`] but also reports the provider.
///
/// A passthrough caused by a failed extraction reports `Unknown`, since the
/// returned URL is not a provider embed URL.
pub fn resolve_embed(raw: &str, params: &EmbedParameters) -> EmbedResult {
    let Some(rule) = find_rule(raw) else {
        debug!(url = raw, "no video provider matched");
        return passthrough(raw);
    };

    match (rule.build)(raw, params) {
        Some(embed_url) => {
            debug!(provider = %rule.provider, url = raw, "built embed url");
            EmbedResult {
                embed_url,
                provider: rule.provider,
            }
        }
        None => {
            debug!(provider = %rule.provider, url = raw, "video id extraction failed, passing through");
            passthrough(raw)
        }
    }
}

fn passthrough(raw: &str) -> EmbedResult {
    EmbedResult {
        embed_url: raw.to_string(),
        provider: VideoProvider::Unknown,
    }
}

/// True if the URL path ends in a known video file extension.
/// Query string and fragment are ignored.
pub fn has_video_file_extension(raw: &str) -> bool {
    let path = raw.split(['?', '#']).next().unwrap_or("").to_lowercase();
    VIDEO_FILE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

// ----------------------------------------------------------------------------
// Predicates
// ----------------------------------------------------------------------------

fn is_youtube(raw: &str) -> bool {
    raw.contains(YOUTUBE_WATCH) || raw.contains(YOUTUBE_SHORT)
}

fn is_vimeo(raw: &str) -> bool {
    raw.contains(VIMEO)
}

fn is_dailymotion(raw: &str) -> bool {
    raw.contains(DAILYMOTION)
}

fn is_facebook_video(raw: &str) -> bool {
    raw.contains(FACEBOOK) && raw.contains("/videos/")
}

fn is_instagram_post(raw: &str) -> bool {
    after(raw, INSTAGRAM_POST).is_some_and(|rest| rest.contains('/'))
}

fn is_tiktok_video(raw: &str) -> bool {
    raw.contains(TIKTOK) && raw.contains("/video/")
}

// ----------------------------------------------------------------------------
// Identifier extraction
// ----------------------------------------------------------------------------

/// Everything after the first occurrence of `marker`.
fn after<'a>(raw: &'a str, marker: &str) -> Option<&'a str> {
    raw.find(marker).map(|idx| &raw[idx + marker.len()..])
}

/// Video identifiers are restricted to URL-safe characters so they can be
/// pasted into an embed path without escaping. Anything else (`%`, `/`, `+`,
/// whitespace) counts as a failed extraction.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// The text after `marker`, cut at the query string or fragment.
fn id_after<'a>(raw: &'a str, marker: &str) -> Option<&'a str> {
    let rest = after(raw, marker)?;
    let id = rest.split(['?', '#']).next().unwrap_or("");
    is_safe_id(id).then_some(id)
}

/// The raw `v` query value, cut at the next `&`. It is never percent-decoded.
fn youtube_id(raw: &str) -> Option<&str> {
    if raw.contains(YOUTUBE_SHORT) {
        return id_after(raw, YOUTUBE_SHORT);
    }

    let query = after(raw, "?")?;
    let query = query.split('#').next().unwrap_or("");
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| is_safe_id(id))
}

// ----------------------------------------------------------------------------
// Builders
// ----------------------------------------------------------------------------

fn build_youtube(raw: &str, params: &EmbedParameters) -> Option<String> {
    let id = youtube_id(raw)?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    if params.autoplay {
        query.append_pair("autoplay", "1");
    }
    if params.muted {
        query.append_pair("mute", "1");
    }
    if params.loop_playback {
        // Single-video looping only works when the video is also its own playlist.
        query.append_pair("loop", "1");
        query.append_pair("playlist", id);
    }
    query.append_pair("rel", "0");
    query.append_pair("modestbranding", "1");
    Some(format!(
        "https://www.youtube.com/embed/{}?{}",
        id,
        query.finish()
    ))
}

fn build_vimeo(raw: &str, params: &EmbedParameters) -> Option<String> {
    let id = id_after(raw, VIMEO)?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    if params.autoplay {
        query.append_pair("autoplay", "1");
    }
    // Vimeo spells the flag `muted`; YouTube and Dailymotion use `mute`.
    if params.muted {
        query.append_pair("muted", "1");
    }
    if params.loop_playback {
        query.append_pair("loop", "1");
    }
    query.append_pair("title", "0");
    query.append_pair("byline", "0");
    query.append_pair("portrait", "0");
    Some(format!(
        "https://player.vimeo.com/video/{}?{}",
        id,
        query.finish()
    ))
}

fn build_dailymotion(raw: &str, params: &EmbedParameters) -> Option<String> {
    let id = id_after(raw, DAILYMOTION)?;
    let mut query = form_urlencoded::Serializer::new(String::new());
    if params.autoplay {
        query.append_pair("autoplay", "1");
    }
    if params.muted {
        query.append_pair("mute", "1");
    }
    if params.loop_playback {
        query.append_pair("loop", "1");
    }
    query.append_pair("ui-logo", "0");
    query.append_pair("ui-start-screen-info", "0");
    Some(format!(
        "https://www.dailymotion.com/embed/video/{}?{}",
        id,
        query.finish()
    ))
}

fn build_facebook(raw: &str, _params: &EmbedParameters) -> Option<String> {
    Some(raw.replacen("facebook.com", "facebook.com/plugins/video.php", 1))
}

fn build_instagram(raw: &str, _params: &EmbedParameters) -> Option<String> {
    let rest = after(raw, INSTAGRAM_POST)?;
    let id = rest.split('/').next().unwrap_or("");
    if !is_safe_id(id) {
        return None;
    }
    Some(format!("https://www.instagram.com/p/{}/embed/", id))
}

fn build_tiktok(raw: &str, _params: &EmbedParameters) -> Option<String> {
    Some(raw.replacen("tiktok.com", "tiktok.com/embed", 1))
}

fn build_direct_file(raw: &str, _params: &EmbedParameters) -> Option<String> {
    Some(raw.to_string())
}
