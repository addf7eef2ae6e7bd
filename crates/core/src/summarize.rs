use crate::{
    error::LlmError,
    llm::{CompletionClient, CompletionRequest},
    text::truncate_chars,
    types::{Outline, RefinedContent, SourceKind},
};

/// Context budget for the source text sent to the model.
pub const MAX_SOURCE_CHARS: usize = 50_000;

const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Refinement {
    pub title: String,
    pub content: RefinedContent,
}

pub fn build_refine_prompt(
    kind: SourceKind,
    title: &str,
    content: &str,
    key_points: Option<usize>,
) -> String {
    let source = match kind {
        SourceKind::Video => "YouTube video transcript",
        SourceKind::Article => "blog/website",
    };
    let count = match key_points {
        Some(n) => format!("exactly {n}"),
        None => "5-8".to_string(),
    };

    format!(
        r#"You are an expert content analyzer and summarizer.
Given the following content from a {source}, create a refined, well-structured summary that captures the key points and main ideas.

Original Title: {title}

Content:
{content}

Please provide:
1. A refined, engaging title for a presentation
2. A concise executive summary (2-3 sentences)
3. {count} key points or sections that would make good presentation slides
4. For each key point, a brief explanation (1-2 sentences)

Format your response as JSON with this structure:
{{
    "title": "Refined presentation title",
    "summary": "Executive summary here",
    "key_points": [
        {{
            "heading": "Key Point 1",
            "content": "Brief explanation of this point"
        }}
    ]
}}

Ensure the content is suitable for a professional presentation."#
    )
}

/// Span from the first `{` to the last `}`. Braces inside prose can fool it.
pub fn find_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn parse_outline(response: &str) -> Option<Outline> {
    let span = find_json_span(response)?;
    serde_json::from_str::<Outline>(span)
        .inspect_err(|e| tracing::debug!(error = %e, "Model reply is not an outline"))
        .ok()
}

/// Ask the model for an outline. A non-JSON reply is kept verbatim as unstructured content;
/// only a failed model call is an error.
#[tracing::instrument(skip(llm, raw_content))]
pub async fn refine<L: CompletionClient>(
    llm: &L,
    kind: SourceKind,
    title: &str,
    raw_content: &str,
    key_points: Option<usize>,
) -> Result<Refinement, LlmError> {
    let content = truncate_chars(raw_content, MAX_SOURCE_CHARS);
    let prompt = build_refine_prompt(kind, title, content, key_points);

    let response = llm
        .complete(&CompletionRequest::new(prompt, TEMPERATURE))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to refine content"))?;

    Ok(match parse_outline(&response) {
        Some(outline) => Refinement {
            title: outline
                .title
                .clone()
                .unwrap_or_else(|| title.to_string()),
            content: RefinedContent::Structured(outline),
        },
        None => {
            tracing::warn!("Model reply carried no JSON outline, keeping it as plain text");
            Refinement {
                title: title.to_string(),
                content: RefinedContent::Unstructured(response),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_span_is_greedy_between_outer_braces() {
        let reply = "Sure! Here you go:\n```json\n{\"title\": \"A\", \"key_points\": [{\"heading\": \"x\"}]}\n```";
        assert_eq!(
            find_json_span(reply),
            Some("{\"title\": \"A\", \"key_points\": [{\"heading\": \"x\"}]}")
        );
    }

    #[test]
    fn no_span_without_braces() {
        assert_eq!(find_json_span("plain prose answer"), None);
        assert_eq!(find_json_span("} backwards {"), None);
    }

    #[test]
    fn parses_outline_with_missing_fields() {
        let outline = parse_outline(r#"{"key_points": [{"content": "only content"}]}"#).unwrap();
        assert_eq!(outline.title, None);
        assert_eq!(outline.key_points.len(), 1);
        assert_eq!(outline.key_points[0].heading, None);
    }

    #[test]
    fn prose_braces_break_the_outline() {
        assert!(parse_outline("Use {curly} braces. {\"title\": \"T\"}").is_none());
    }

    #[test]
    fn prompt_reflects_source_kind_and_requested_count() {
        let prompt = build_refine_prompt(SourceKind::Video, "Talk", "words", None);
        assert!(prompt.contains("YouTube video transcript"));
        assert!(prompt.contains("5-8 key points"));
        assert!(prompt.contains("Original Title: Talk"));

        let prompt = build_refine_prompt(SourceKind::Article, "Post", "words", Some(4));
        assert!(prompt.contains("blog/website"));
        assert!(prompt.contains("exactly 4 key points"));
    }
}
