use std::sync::{Arc, Mutex};
use slidecast_core::{ExtractionError, TranscriptSource, types::TranscriptSegment};

#[derive(Clone)]
pub struct MockTranscripts {
    pub segments: Vec<TranscriptSegment>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockTranscripts {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            segments: lines
                .iter()
                .enumerate()
                .map(|(i, text)| TranscriptSegment {
                    text: text.to_string(),
                    start: i as f64 * 4.0,
                    duration: 4.0,
                })
                .collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            segments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl TranscriptSource for MockTranscripts {
    async fn fetch_segments(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptSegment>, ExtractionError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(ExtractionError::Transcript(msg.clone()));
        }
        Ok(self.segments.clone())
    }
}
