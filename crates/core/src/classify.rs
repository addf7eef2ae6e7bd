use std::sync::LazyLock;

use regex::Regex;

use crate::types::SourceKind;

const VIDEO_URL_SHAPES: &str =
    r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)";

static VIDEO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(VIDEO_URL_SHAPES).expect("video url pattern"));

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{VIDEO_URL_SHAPES}([a-zA-Z0-9_-]{{11}})")).expect("video id pattern")
});

/// Anything that is not a recognized video link is treated as an article.
pub fn classify_url(url: &str) -> SourceKind {
    if VIDEO_URL.is_match(url) {
        SourceKind::Video
    } else {
        SourceKind::Article
    }
}

/// Extract the 11-character video id from canonical, short, embed, `/v/` and shorts links.
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_video_link_shape() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "youtube.com/watch?v=short",
        ] {
            assert_eq!(classify_url(url), SourceKind::Video, "{url}");
        }
    }

    #[test]
    fn everything_else_is_an_article() {
        for url in [
            "https://example.com/article",
            "https://blog.rust-lang.org/2024/01/01/post.html",
            "https://www.youtube.com/@SomeChannel",
            "https://vimeo.com/123456",
            "",
        ] {
            assert_eq!(classify_url(url), SourceKind::Article, "{url}");
        }
    }

    #[test]
    fn extracts_ids_from_all_shapes() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/abc12345678?si=xyz"),
            Some("abc12345678")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/A_b-C_d-E_f"),
            Some("A_b-C_d-E_f")
        );
    }

    #[test]
    fn rejects_ids_that_are_too_short() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id("https://example.com/article"), None);
    }
}
