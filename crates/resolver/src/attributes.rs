// ABOUTME: Hardened iframe attribute set applied to every embedded video.
// ABOUTME: Only the title and fullscreen flag vary; everything else is a fixed constant.

use serde::{Deserialize, Serialize};

pub const CLASS_NAME: &str = "w-full h-full";
pub const FRAME_BORDER: &str = "0";
pub const ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
pub const SANDBOX: &str =
    "allow-scripts allow-same-origin allow-presentation allow-popups allow-popups-to-escape-sandbox";
pub const LOADING: &str = "lazy";

/// Attributes for an `<iframe>` that hosts third-party video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IframeAttributes {
    pub title: String,
    pub class_name: String,
    pub frame_border: String,
    pub allow: String,
    pub allow_full_screen: bool,
    pub sandbox: String,
    pub loading: String,
}

impl IframeAttributes {
    /// Attributes with fullscreen allowed.
    pub fn new(title: impl Into<String>) -> Self {
        secure_iframe_attributes(title, true)
    }

    /// Serializes the attributes as an `<iframe>` element pointing at `src`.
    /// Every value goes through `ammonia::clean_text`, which entity-encodes
    /// quotes, angle brackets, `=`, `/` and whitespace.
    pub fn to_html(&self, src: &str) -> String {
        let mut html = format!(
            r#"<iframe src="{}" title="{}" class="{}" frameborder="{}" allow="{}" sandbox="{}" loading="{}""#,
            ammonia::clean_text(src),
            ammonia::clean_text(&self.title),
            ammonia::clean_text(&self.class_name),
            ammonia::clean_text(&self.frame_border),
            ammonia::clean_text(&self.allow),
            ammonia::clean_text(&self.sandbox),
            ammonia::clean_text(&self.loading),
        );
        if self.allow_full_screen {
            html.push_str(" allowfullscreen");
        }
        html.push_str("></iframe>");
        html
    }
}

/// Builds the fixed attribute set. `title` is for accessibility labelling.
pub fn secure_iframe_attributes(title: impl Into<String>, allow_full_screen: bool) -> IframeAttributes {
    IframeAttributes {
        title: title.into(),
        class_name: CLASS_NAME.to_string(),
        frame_border: FRAME_BORDER.to_string(),
        allow: ALLOW.to_string(),
        allow_full_screen,
        sandbox: SANDBOX.to_string(),
        loading: LOADING.to_string(),
    }
}
