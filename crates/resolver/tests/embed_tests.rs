// ABOUTME: Integration tests for the public embedguard-resolver API.
// ABOUTME: Covers sanitizing, allowlist checks, embed URL building, attributes, and the gated pipeline.

use embedguard_resolver::{
    get_default_video_embed_url, get_secure_iframe_attributes, get_video_embed_url,
    is_allowed_video_platform, sanitize_video_url, EmbedError, EmbedParameters, Resolver,
    ResolverOptions, VideoProvider,
};

mod embed_url_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_youtube_forms_share_embed_url() {
        for raw in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&list=PL1",
            "https://youtu.be/dQw4w9WgXcQ",
        ] {
            let url = get_default_video_embed_url(raw);
            assert!(
                url.starts_with("https://www.youtube.com/embed/dQw4w9WgXcQ?"),
                "{} -> {}",
                raw,
                url
            );
            assert!(url.contains("rel=0"));
            assert!(url.contains("modestbranding=1"));
        }
    }

    #[test]
    fn test_youtube_all_flags() {
        let url = get_video_embed_url("https://www.youtube.com/watch?v=abc123", true, true, true);
        assert!(url.contains("autoplay=1"));
        assert!(url.contains("mute=1"));
        assert!(url.contains("loop=1"));
        assert!(url.contains("playlist=abc123"));
    }

    #[test]
    fn test_vimeo_exact_output() {
        assert_eq!(
            get_video_embed_url("https://vimeo.com/76979871", false, true, false),
            "https://player.vimeo.com/video/76979871?muted=1&title=0&byline=0&portrait=0"
        );
    }

    #[test]
    fn test_direct_file_unchanged() {
        assert_eq!(
            get_default_video_embed_url("https://example.com/movie.mp4"),
            "https://example.com/movie.mp4"
        );
    }

    #[test]
    fn test_garbage_unchanged() {
        assert_eq!(get_default_video_embed_url("not a url at all"), "not a url at all");
    }

    #[test]
    fn test_default_flags_match_explicit_defaults() {
        let raw = "https://www.dailymotion.com/video/x7tgad0";
        assert_eq!(
            get_default_video_embed_url(raw),
            get_video_embed_url(raw, false, true, false)
        );
    }
}

mod allowlist_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allowed_platforms() {
        assert!(is_allowed_video_platform("https://www.tiktok.com/@user/video/123"));
        assert!(!is_allowed_video_platform("https://evil.com/video"));
        assert!(is_allowed_video_platform("https://cdn.example.com/clip.mp4"));
    }

    #[test]
    fn test_non_http_scheme_rejected_on_allowed_host() {
        assert!(!is_allowed_video_platform("ftp://youtube.com/x"));
        assert!(!is_allowed_video_platform("javascript://youtube.com/%0aalert(1)"));
    }

    #[test]
    fn test_injected_allowlist_replaces_builtin() {
        let resolver = Resolver::builder()
            .allowed_domains(["videos.example.org"])
            .build()
            .unwrap();
        assert!(resolver.is_allowed("https://videos.example.org/v/1"));
        assert!(!resolver.is_allowed("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn test_allowlist_from_json_options() {
        let opts = ResolverOptions::from_json_str(r#"{"allowed_domains": ["vimeo.com"]}"#).unwrap();
        let resolver = Resolver::new(opts).unwrap();
        assert!(resolver.is_allowed("https://vimeo.com/1"));
        assert!(!resolver.is_allowed("https://www.tiktok.com/@user/video/123"));
    }
}

mod sanitize_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_javascript_removed() {
        assert!(!sanitize_video_url("javascript:alert(1)").contains("javascript:"));
    }

    #[test]
    fn test_script_removed_url_kept() {
        let out = sanitize_video_url("<script>alert(1)</script>https://youtu.be/x");
        assert!(!out.contains("<script>"));
        assert!(out.ends_with("https://youtu.be/x"));
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "javascript:alert(1)",
            "<script>alert(1)</script>https://youtu.be/x",
            " https://vimeo.com/1 onload=x ",
            "JAVASCRIPT:javascript:x",
        ] {
            let once = sanitize_video_url(input);
            assert_eq!(sanitize_video_url(&once), once);
        }
    }
}

mod attribute_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_attributes() {
        let attrs = get_secure_iframe_attributes("Demo", true);
        assert!(attrs.allow_full_screen);
        assert_eq!(attrs.title, "Demo");
        assert_eq!(attrs.frame_border, "0");
        assert_eq!(
            attrs.allow,
            "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
        );
        assert_eq!(
            attrs.sandbox,
            "allow-scripts allow-same-origin allow-presentation allow-popups allow-popups-to-escape-sandbox"
        );
        assert_eq!(attrs.loading, "lazy");
    }
}

mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rejected_url_never_built() {
        let err = Resolver::default()
            .resolve("https://evil.com/watch?v=abc", None, "x")
            .unwrap_err();
        assert!(err.is_not_allowed());
    }

    #[test]
    fn test_tiktok_pipeline() {
        let resolved = Resolver::default()
            .resolve(
                "  https://www.tiktok.com/@user/video/123  ",
                Some(&EmbedParameters::new(true, false, true)),
                "Clip",
            )
            .unwrap();
        assert_eq!(resolved.result.provider, VideoProvider::TikTok);
        assert_eq!(
            resolved.result.embed_url,
            "https://www.tiktok.com/embed/@user/video/123"
        );
        assert_eq!(resolved.attributes.title, "Clip");
    }

    #[test]
    fn test_direct_file_pipeline() {
        let resolved = Resolver::default()
            .resolve("https://cdn.example.com/clip.webm", None, "Clip")
            .unwrap();
        assert_eq!(resolved.result.provider, VideoProvider::DirectFile);
        assert!(!resolved.result.provider.is_iframe_embeddable());
    }

    #[test]
    fn test_allowed_host_without_video_passes_through_as_unknown() {
        let resolved = Resolver::default()
            .resolve("https://www.youtube.com/@channel", None, "x")
            .unwrap();
        assert_eq!(resolved.result.provider, VideoProvider::Unknown);
        assert_eq!(resolved.result.embed_url, "https://www.youtube.com/@channel");
    }

    #[test]
    fn test_javascript_only_input_is_empty() {
        assert_eq!(
            Resolver::default().resolve("javascript:", None, "x"),
            Err(EmbedError::Empty)
        );
    }

    #[test]
    fn test_resolved_embed_serializes_flat() {
        let resolved = Resolver::default()
            .resolve("https://vimeo.com/76979871", None, "Demo")
            .unwrap();
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["provider"], "vimeo");
        assert_eq!(
            json["embedUrl"],
            "https://player.vimeo.com/video/76979871?muted=1&title=0&byline=0&portrait=0"
        );
        assert_eq!(json["attributes"]["title"], "Demo");
    }
}
