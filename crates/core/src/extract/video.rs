use std::time::Duration;

use serde::Deserialize;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::{
    classify::extract_video_id,
    error::ExtractionError,
    extract::{Extraction, PageFetcher, TranscriptSource},
    types::{SourceKind, TranscriptSegment},
};

const OEMBED_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: Option<String>,
}

/// Transcript text joined with single spaces, plus the video title when it can be looked up.
#[tracing::instrument(skip(transcripts, fetcher))]
pub async fn extract_video<T, F>(
    url: &str,
    transcripts: &T,
    fetcher: &F,
) -> Result<Extraction, ExtractionError>
where
    T: TranscriptSource,
    F: PageFetcher,
{
    let video_id = extract_video_id(url).ok_or(ExtractionError::MissingVideoId)?;

    let segments = transcripts.fetch_segments(video_id).await?;
    let raw_content = segments
        .iter()
        .map(|seg| seg.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(video_id, segments = segments.len(), "Transcript fetched");

    let title = fetch_video_title(video_id, fetcher)
        .await
        .unwrap_or_else(|| SourceKind::Video.placeholder_title().to_string());

    Ok(Extraction { title, raw_content })
}

/// oEmbed lookup. Any failure yields `None`.
pub async fn fetch_video_title<F: PageFetcher>(video_id: &str, fetcher: &F) -> Option<String> {
    let oembed_url = format!(
        "https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v={video_id}&format=json"
    );

    let body = fetcher
        .fetch_text(&oembed_url, OEMBED_TIMEOUT)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, video_id, "Video title lookup failed"))
        .ok()?;

    serde_json::from_str::<OEmbed>(&body)
        .inspect_err(|e| tracing::warn!(error = %e, video_id, "Malformed oEmbed payload"))
        .ok()?
        .title
}

/// Caption retrieval backed by the public YouTube transcript endpoints.
pub struct YoutubeTranscripts {
    languages: Vec<String>,
}

impl YoutubeTranscripts {
    pub fn new() -> Self {
        Self {
            languages: vec!["en".to_string()],
        }
    }

    pub fn with_languages(mut self, languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for YoutubeTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptSource for YoutubeTranscripts {
    async fn fetch_segments(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptSegment>, ExtractionError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| ExtractionError::Transcript(e.to_string()))?;
        let languages = self.languages.iter().map(String::as_str).collect::<Vec<_>>();

        let transcript = api
            .fetch_transcript(video_id, &languages, false)
            .await
            .inspect_err(|e| tracing::error!(error = %e, video_id, "Failed to fetch transcript"))
            .map_err(|e| ExtractionError::Transcript(e.to_string()))?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptSegment {
                text: snippet.text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect())
    }
}
