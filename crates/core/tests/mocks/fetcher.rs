use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use slidecast_core::{FetchError, PageFetcher};

/// Serves canned bodies for URLs starting with a registered prefix; anything else is a 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    pub pages: Vec<(String, String)>,
    pub calls: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl MockFetcher {
    pub fn with_page(mut self, prefix: &str, body: &str) -> Self {
        self.pages.push((prefix.to_string(), body.to_string()));
        self
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push((url.to_string(), timeout));
        self.pages
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
