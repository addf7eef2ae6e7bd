use crate::{
    classify::classify_url,
    extract::{PageFetcher, TranscriptSource, extract_source},
    llm::CompletionClient,
    slides::{SlideInput, build_slides},
    summarize::refine,
    types::{PresentationResult, RefinedContent, Slide, SourceKind},
};

/// Request-scoped state. Each step takes it by value and hands back the next version.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub url: String,
    pub kind: SourceKind,
    pub title: String,
    pub raw_content: String,
    pub refined: Option<RefinedContent>,
    pub slides: Vec<Slide>,
    pub error: Option<String>,
    pub slide_count: Option<usize>,
}

impl PipelineState {
    pub fn new(url: impl Into<String>, slide_count: Option<usize>) -> Self {
        Self {
            url: url.into(),
            kind: SourceKind::Article,
            title: String::new(),
            raw_content: String::new(),
            refined: None,
            slides: Vec::new(),
            error: None,
            slide_count,
        }
    }

    /// Key points to request and content slides to keep when a slide count was asked for.
    pub fn content_slide_budget(&self) -> Option<usize> {
        self.slide_count.map(|n| n.saturating_sub(2).max(1))
    }

    pub fn into_result(self) -> PresentationResult {
        PresentationResult {
            success: self.error.is_none(),
            url: self.url,
            url_type: self.kind,
            title: self.title,
            slides: self.slides,
            error: self.error,
        }
    }
}

pub fn classify(mut state: PipelineState) -> PipelineState {
    state.kind = classify_url(&state.url);
    tracing::info!(kind = state.kind.as_str(), "URL classified");
    state
}

pub fn build(mut state: PipelineState) -> PipelineState {
    state.slides = build_slides(&SlideInput {
        url: &state.url,
        title: &state.title,
        raw_content: &state.raw_content,
        refined: state.refined.as_ref(),
        error: state.error.as_deref(),
        max_content_slides: state.content_slide_budget(),
    });
    tracing::info!(slides = state.slides.len(), "Slides built");
    state
}

/// URL to slides: classify, extract, summarize, build.
pub struct Pipeline<L, T, F> {
    llm: L,
    transcripts: T,
    fetcher: F,
}

impl<L, T, F> Pipeline<L, T, F>
where
    L: CompletionClient,
    T: TranscriptSource,
    F: PageFetcher,
{
    pub fn new(llm: L, transcripts: T, fetcher: F) -> Self {
        Self {
            llm,
            transcripts,
            fetcher,
        }
    }

    /// Never fails: extraction and summarization problems end up in `error` and degrade the slides.
    #[tracing::instrument(skip(self))]
    pub async fn process_url(&self, url: &str, slide_count: Option<usize>) -> PresentationResult {
        let state = classify(PipelineState::new(url, slide_count));
        let state = self.extract(state).await;
        let state = self.refine(state).await;
        build(state).into_result()
    }

    pub async fn extract(&self, mut state: PipelineState) -> PipelineState {
        match extract_source(state.kind, &state.url, &self.transcripts, &self.fetcher).await {
            Ok(extraction) => {
                state.title = extraction.title;
                state.raw_content = extraction.raw_content;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Extraction failed");
                state.title = state.kind.placeholder_title().to_string();
                state.raw_content = String::new();
                state.error = Some(e.to_string());
            }
        }
        state
    }

    pub async fn refine(&self, mut state: PipelineState) -> PipelineState {
        if state.error.is_some() || state.raw_content.is_empty() {
            return state;
        }

        match refine(
            &self.llm,
            state.kind,
            &state.title,
            &state.raw_content,
            state.content_slide_budget(),
        )
        .await
        {
            Ok(refinement) => {
                state.title = refinement.title;
                state.refined = Some(refinement.content);
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Summarization failed, falling back to raw text");
                state.error = Some(format!(
                    "Failed to refine content with the language model: {e}"
                ));
                state.refined = Some(RefinedContent::Unstructured(state.raw_content.clone()));
            }
        }
        state
    }
}
