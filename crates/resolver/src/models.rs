// ABOUTME: Value types shared by the classifier, builder, and resolver.
// ABOUTME: Defines VideoProvider, EmbedParameters, EmbedResult, and ResolvedEmbed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attributes::IframeAttributes;

/// The video host a raw URL was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoProvider {
    #[serde(rename = "youtube")]
    YouTube,
    Vimeo,
    Dailymotion,
    FacebookVideo,
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    DirectFile,
    Unknown,
}

impl VideoProvider {
    /// All providers in classification order, `Unknown` last.
    pub const ALL: [VideoProvider; 8] = [
        VideoProvider::YouTube,
        VideoProvider::Vimeo,
        VideoProvider::Dailymotion,
        VideoProvider::FacebookVideo,
        VideoProvider::Instagram,
        VideoProvider::TikTok,
        VideoProvider::DirectFile,
        VideoProvider::Unknown,
    ];

    /// Stable lowercase name used in JSON and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::YouTube => "youtube",
            VideoProvider::Vimeo => "vimeo",
            VideoProvider::Dailymotion => "dailymotion",
            VideoProvider::FacebookVideo => "facebook_video",
            VideoProvider::Instagram => "instagram",
            VideoProvider::TikTok => "tiktok",
            VideoProvider::DirectFile => "direct_file",
            VideoProvider::Unknown => "unknown",
        }
    }

    /// True for hosted providers whose embed URL belongs in an iframe.
    /// Direct files are media sources and unknown URLs are not embeddable.
    pub fn is_iframe_embeddable(&self) -> bool {
        !matches!(self, VideoProvider::DirectFile | VideoProvider::Unknown)
    }
}

impl fmt::Display for VideoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        VideoProvider::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| format!("unknown video provider: {}", s))
    }
}

/// Playback flags applied when building an embed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedParameters {
    pub autoplay: bool,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl EmbedParameters {
    pub fn new(autoplay: bool, muted: bool, loop_playback: bool) -> Self {
        Self {
            autoplay,
            muted,
            loop_playback,
        }
    }
}

impl Default for EmbedParameters {
    fn default() -> Self {
        Self {
            autoplay: false,
            muted: true,
            loop_playback: false,
        }
    }
}

/// A rewritten (or passed-through) embed URL and the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResult {
    pub embed_url: String,
    pub provider: VideoProvider,
}

/// Output of the gated pipeline: the embed URL plus the iframe attributes to render it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEmbed {
    #[serde(flatten)]
    pub result: EmbedResult,
    pub attributes: IframeAttributes,
}
