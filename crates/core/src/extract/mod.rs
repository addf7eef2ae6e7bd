pub mod article;
pub mod video;

use std::{future::Future, time::Duration};

use reqwest::{Client, header};

use crate::{
    error::{ExtractionError, FetchError},
    types::{SourceKind, TranscriptSegment},
};

pub use article::{extract_article, parse_article};
pub use video::{YoutubeTranscripts, extract_video, fetch_video_title};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Plain HTTP GET returning the body as text. Non-2xx responses are errors.
pub trait PageFetcher {
    fn fetch_text(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>>;
}

/// Timed caption segments for a video, in playback order.
pub trait TranscriptSource {
    fn fetch_segments(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<Vec<TranscriptSegment>, ExtractionError>>;
}

/// Source text plus the best title known so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: String,
    pub raw_content: String,
}

/// Dispatch on the source kind.
pub async fn extract_source<T, F>(
    kind: SourceKind,
    url: &str,
    transcripts: &T,
    fetcher: &F,
) -> Result<Extraction, ExtractionError>
where
    T: TranscriptSource,
    F: PageFetcher,
{
    match kind {
        SourceKind::Video => extract_video(url, transcripts, fetcher).await,
        SourceKind::Article => extract_article(url, fetcher).await,
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(timeout)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, url, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}
