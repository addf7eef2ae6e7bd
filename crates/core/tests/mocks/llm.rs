use std::sync::{Arc, Mutex};
use slidecast_core::{CompletionClient, CompletionRequest, LlmError};

#[derive(Clone)]
pub struct MockLlm {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<CompletionRequest>>>,
    pub fail_with: Option<String>,
}

impl MockLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl CompletionClient for MockLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(LlmError::Api {
                status: 429,
                message: msg.clone(),
            });
        }
        Ok(self.reply.clone())
    }
}
