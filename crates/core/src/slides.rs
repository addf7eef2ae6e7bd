use crate::{
    text::{char_len, truncate_chars},
    types::{Outline, RefinedContent, Slide},
};

const SUBTITLE_MAX_CHARS: usize = 200;
const CHUNK_MAX_CHARS: usize = 500;
const MAX_FALLBACK_CHUNKS: usize = 10;
const FALLBACK_BODY_MAX_CHARS: usize = 400;

/// Content slides are numbered from 2; the title slide is 1.
const FIRST_CONTENT_NUMBER: u32 = 2;

/// What the slide builder needs to know about a finished pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct SlideInput<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub raw_content: &'a str,
    pub refined: Option<&'a RefinedContent>,
    pub error: Option<&'a str>,
    /// Upper bound on content slides.
    pub max_content_slides: Option<usize>,
}

/// Deterministic: the same input always yields the same slides.
pub fn build_slides(input: &SlideInput<'_>) -> Vec<Slide> {
    match (input.refined, input.error) {
        (None, Some(error)) => vec![Slide::error(error)],
        (Some(RefinedContent::Structured(outline)), _) => structured_slides(outline, input),
        (Some(RefinedContent::Unstructured(text)), _) => fallback_slides(text, input),
        (None, None) => fallback_slides(input.raw_content, input),
    }
}

fn structured_slides(outline: &Outline, input: &SlideInput<'_>) -> Vec<Slide> {
    let limit = input.max_content_slides.unwrap_or(usize::MAX);
    let title = outline.title.as_deref().unwrap_or(input.title);
    let subtitle = outline
        .summary
        .as_deref()
        .map(|s| truncate_chars(s, SUBTITLE_MAX_CHARS))
        .unwrap_or_default();

    let mut slides = vec![Slide::title(title, subtitle)];
    slides.extend(
        outline
            .key_points
            .iter()
            .take(limit)
            .zip(FIRST_CONTENT_NUMBER..)
            .enumerate()
            .map(|(i, (point, number))| {
                let heading = point
                    .heading
                    .clone()
                    .unwrap_or_else(|| format!("Point {}", i + 1));
                Slide::content(heading, point.content.clone().unwrap_or_default(), number)
            }),
    );
    slides.push(Slide::closing(format!(
        "Presentation generated from: {}",
        input.url
    )));
    slides
}

fn fallback_slides(text: &str, input: &SlideInput<'_>) -> Vec<Slide> {
    let limit = input
        .max_content_slides
        .map_or(MAX_FALLBACK_CHUNKS, |n| n.min(MAX_FALLBACK_CHUNKS));

    let mut slides = vec![Slide::title(input.title, "")];
    slides.extend(
        chunk_paragraphs(text)
            .iter()
            .take(limit)
            .zip(FIRST_CONTENT_NUMBER..)
            .enumerate()
            .map(|(i, (chunk, number))| {
                Slide::content(
                    format!("Section {}", i + 1),
                    truncate_chars(chunk, FALLBACK_BODY_MAX_CHARS),
                    number,
                )
            }),
    );
    slides.push(Slide::closing(format!("Generated from: {}", input.url)));
    slides
}

/// Greedily pack blank-line separated paragraphs into chunks of under 500 characters.
/// A single oversized paragraph becomes its own chunk.
pub fn chunk_paragraphs(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        if char_len(&current) + char_len(paragraph) < CHUNK_MAX_CHARS {
            current.push_str(paragraph);
            current.push_str("\n\n");
        } else {
            push_chunk(&mut chunks, &current);
            current = format!("{paragraph}\n\n");
        }
    }
    push_chunk(&mut chunks, &current);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyPoint, SlideKind};

    const URL: &str = "https://example.com/post";

    fn input<'a>(refined: Option<&'a RefinedContent>, error: Option<&'a str>) -> SlideInput<'a> {
        SlideInput {
            url: URL,
            title: "Extracted title",
            raw_content: "",
            refined,
            error,
            max_content_slides: None,
        }
    }

    fn outline(points: usize) -> RefinedContent {
        RefinedContent::Structured(Outline {
            title: Some("Refined".to_string()),
            summary: Some("s".repeat(300)),
            key_points: (0..points)
                .map(|i| KeyPoint {
                    heading: Some(format!("Heading {i}")),
                    content: Some(format!("Body {i}")),
                })
                .collect(),
        })
    }

    #[test]
    fn structured_outline_yields_title_points_and_closing() {
        let refined = outline(6);
        let slides = build_slides(&input(Some(&refined), None));

        assert_eq!(slides.len(), 8);
        assert_eq!(slides[0].kind, SlideKind::Title);
        assert_eq!(slides[0].title, "Refined");
        assert_eq!(slides[0].subtitle_text().chars().count(), 200);
        let numbers: Vec<u32> = slides[1..7].iter().filter_map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(slides[1].title, "Heading 0");
        assert_eq!(slides[1].content_text(), "Body 0");
        assert_eq!(slides[7].kind, SlideKind::Closing);
        assert_eq!(slides[7].title, "Thank You");
        assert_eq!(
            slides[7].content_text(),
            "Presentation generated from: https://example.com/post"
        );
    }

    #[test]
    fn missing_headings_and_titles_get_defaults() {
        let refined = RefinedContent::Structured(Outline {
            title: None,
            summary: None,
            key_points: vec![KeyPoint {
                heading: None,
                content: None,
            }],
        });
        let slides = build_slides(&input(Some(&refined), None));

        assert_eq!(slides[0].title, "Extracted title");
        assert_eq!(slides[0].subtitle_text(), "");
        assert_eq!(slides[1].title, "Point 1");
        assert_eq!(slides[1].content_text(), "");
    }

    #[test]
    fn fallback_never_exceeds_twelve_slides_or_400_chars() {
        let text = (0..40)
            .map(|i| format!("Paragraph {i} {}", "word ".repeat(60)))
            .collect::<Vec<_>>()
            .join("\n\n");
        let refined = RefinedContent::Unstructured(text);
        let slides = build_slides(&input(Some(&refined), None));

        assert_eq!(slides.len(), 12);
        for slide in &slides[1..11] {
            assert_eq!(slide.kind, SlideKind::Content);
            assert!(slide.content_text().chars().count() <= 400);
        }
        assert_eq!(slides[1].title, "Section 1");
        assert_eq!(slides[10].slide_number, Some(11));
        assert_eq!(slides[11].content_text(), "Generated from: https://example.com/post");
    }

    #[test]
    fn packs_small_paragraphs_together() {
        let chunks = chunk_paragraphs("one\n\ntwo\n\nthree");
        assert_eq!(chunks, vec!["one\n\ntwo\n\nthree".to_string()]);

        let big = "x".repeat(450);
        let chunks = chunk_paragraphs(&format!("{big}\n\n{big}\n\ntail"));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], big);
        assert_eq!(chunks[1], format!("{big}\n\ntail"));
    }

    #[test]
    fn error_without_content_is_a_single_error_slide() {
        let slides = build_slides(&input(None, Some("Failed to fetch blog content: boom")));

        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].kind, SlideKind::Error);
        assert_eq!(slides[0].content_text(), "Failed to fetch blog content: boom");
    }

    #[test]
    fn error_with_fallback_content_still_builds_slides() {
        let refined = RefinedContent::Unstructured("raw transcript text".to_string());
        let slides = build_slides(&input(Some(&refined), Some("model quota exceeded")));

        assert_eq!(slides.len(), 3);
        assert_eq!(slides[1].content_text(), "raw transcript text");
    }

    #[test]
    fn empty_content_without_error_is_title_and_closing() {
        let slides = build_slides(&input(None, None));

        let kinds: Vec<SlideKind> = slides.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SlideKind::Title, SlideKind::Closing]);
        assert_eq!(slides[0].title, "Extracted title");
    }

    #[test]
    fn slide_count_caps_content_slides() {
        let refined = outline(6);
        let mut capped = input(Some(&refined), None);
        capped.max_content_slides = Some(3);

        assert_eq!(build_slides(&capped).len(), 5);
    }

    #[test]
    fn rebuilding_is_byte_identical() {
        let refined = outline(5);
        let first = serde_json::to_string(&build_slides(&input(Some(&refined), None))).unwrap();
        let second = serde_json::to_string(&build_slides(&input(Some(&refined), None))).unwrap();
        assert_eq!(first, second);
    }
}
