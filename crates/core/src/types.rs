use serde::{Deserialize, Serialize};

/// Where the source text comes from. Serialized with the names the web client expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "youtube")]
    Video,
    #[serde(rename = "blog")]
    Article,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Video => "youtube",
            SourceKind::Article => "blog",
        }
    }

    pub fn placeholder_title(&self) -> &'static str {
        match self {
            SourceKind::Video => "YouTube Video Presentation",
            SourceKind::Article => "Blog Content Presentation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Title,
    #[default]
    Content,
    Closing,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "type", default)]
    pub kind: SlideKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_number: Option<u32>,
}

impl Slide {
    pub fn title(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Title,
            title: title.into(),
            subtitle: Some(subtitle.into()),
            content: None,
            slide_number: None,
        }
    }

    pub fn content(title: impl Into<String>, content: impl Into<String>, number: u32) -> Self {
        Self {
            kind: SlideKind::Content,
            title: title.into(),
            subtitle: None,
            content: Some(content.into()),
            slide_number: Some(number),
        }
    }

    pub fn closing(content: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Closing,
            title: "Thank You".to_string(),
            subtitle: None,
            content: Some(content.into()),
            slide_number: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: SlideKind::Error,
            title: "Error".to_string(),
            subtitle: None,
            content: Some(message.into()),
            slide_number: None,
        }
    }

    pub fn subtitle_text(&self) -> &str {
        self.subtitle.as_deref().unwrap_or_default()
    }

    pub fn content_text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Structured outline returned by the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Output of the summarizer step.
#[derive(Debug, Clone, PartialEq)]
pub enum RefinedContent {
    Structured(Outline),
    /// Free text to be chunked: either the model's non-JSON reply or the raw source text.
    Unstructured(String),
}

/// Caller-visible result of the generation entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationResult {
    pub success: bool,
    pub url: String,
    pub url_type: SourceKind,
    pub title: String,
    pub slides: Vec<Slide>,
    pub error: Option<String>,
}
