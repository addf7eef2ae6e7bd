use std::{future::Future, time::Duration};

use reqwest::Client;

use crate::{error::LlmError, provider::Provider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    /// Replaces the client's default model for this request only.
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// Single-shot, non-streaming text completion.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest)
    -> impl Future<Output = Result<String, LlmError>>;
}

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(provider: Provider) -> Result<Self, LlmError> {
        let config = provider.config();
        let api_key = provider.validate_api_key()?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.to_string(),
            api_key,
            model: config.model.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for ChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let model = request.model.as_deref().unwrap_or(&self.model);

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": model,
                "messages": [
                    {
                        "role": "user",
                        "content": request.prompt,
                    },
                ],
                "temperature": request.temperature,
            }))
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        let response = resp.json::<serde_json::Value>().await?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidResponse(format!("{:?}", response)))
    }
}
