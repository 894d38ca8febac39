//! Email clients cannot run embeds, so videos degrade to a linked thumbnail
//! and posts to a plain link. Social icons need absolute URLs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/)|youtu\.be/)([A-Za-z0-9_-]+)",
    )
    .expect("valid regex")
});

/// Video id from `youtube.com/watch?v=ID`, `youtu.be/ID` or `youtube.com/embed/ID`
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID_RE
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn youtube_thumbnail_url(id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id)
}

pub fn youtube_watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

pub const SOCIAL_ICON_SIZE: u32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Linkedin,
    Facebook,
    X,
    Youtube,
}

impl SocialPlatform {
    /// Rendering order
    pub const ORDER: [SocialPlatform; 4] = [
        SocialPlatform::Linkedin,
        SocialPlatform::Facebook,
        SocialPlatform::X,
        SocialPlatform::Youtube,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::X => "x",
            SocialPlatform::Youtube => "youtube",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SocialPlatform::Linkedin => "LinkedIn",
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::X => "X",
            SocialPlatform::Youtube => "YouTube",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|platform| platform.as_str() == name)
    }

    pub fn icon_path(self) -> String {
        format!("/social-links/social-{}.png", self.as_str())
    }

    /// Absolute icon URL under `base_url`, or the relative path without one
    pub fn icon_url(self, base_url: Option<&str>) -> String {
        match base_url.map(str::trim).filter(|base| !base.is_empty()) {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.icon_path().trim_start_matches('/')
            ),
            None => self.icon_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

/// Links from a `links` attribute: known platforms with a non-empty url,
/// in platform order. The first entry per platform wins.
pub fn social_links(links: Option<&Value>) -> Vec<SocialLink> {
    let entries = links.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);

    SocialPlatform::ORDER
        .into_iter()
        .filter_map(|platform| {
            entries.iter().find_map(|entry| {
                let name = entry.get("platform").and_then(Value::as_str)?;
                let url = entry
                    .get("url")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|url| !url.is_empty())?;
                (SocialPlatform::from_name(name) == Some(platform)).then(|| SocialLink {
                    platform,
                    url: url.to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_youtube_ids() {
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?v=abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            youtube_video_id("https://youtu.be/abc123").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            youtube_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10")
                .as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_video_id("https://example.com"), None);
        assert_eq!(youtube_video_id(""), None);
    }

    #[test]
    fn test_icon_urls() {
        assert_eq!(
            SocialPlatform::X.icon_url(Some("https://cdn.example.com/")),
            "https://cdn.example.com/social-links/social-x.png"
        );
        assert_eq!(
            SocialPlatform::Linkedin.icon_url(None),
            "/social-links/social-linkedin.png"
        );
        assert_eq!(
            SocialPlatform::Youtube.icon_url(Some("  ")),
            "/social-links/social-youtube.png"
        );
    }

    #[test]
    fn test_social_links_filtered_and_ordered() {
        let links = json!([
            { "platform": "youtube", "url": "https://youtube.com/@acme" },
            { "platform": "myspace", "url": "https://myspace.com/acme" },
            { "platform": "x", "url": "" },
            { "platform": "linkedin", "url": "https://linkedin.com/company/acme" },
            { "platform": "linkedin", "url": "https://linkedin.com/other" }
        ]);

        let parsed = social_links(Some(&links));
        let platforms: Vec<_> = parsed.iter().map(|link| link.platform).collect();
        assert_eq!(
            platforms,
            vec![SocialPlatform::Linkedin, SocialPlatform::Youtube]
        );
        assert_eq!(parsed[0].url, "https://linkedin.com/company/acme");

        assert!(social_links(None).is_empty());
        assert!(social_links(Some(&json!("nope"))).is_empty());
    }
}
