use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{error::TtsError, provider::ELEVENLABS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// Encoding identifier understood by the synthesis API.
    pub fn output_format(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3_44100_128",
            AudioFormat::Wav => "wav_44100",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub format: AudioFormat,
}

pub trait SpeechSynthesizer {
    fn synthesize(&self, request: &SpeechRequest)
    -> impl Future<Output = Result<Vec<u8>, TtsError>>;
}

pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, TtsError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()?,
            api_key: api_key.into(),
            base_url: ELEVENLABS.api_url.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, TtsError> {
        let api_key = std::env::var(ELEVENLABS.env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TtsError::MissingApiKey {
                env_var: ELEVENLABS.env_var.to_string(),
            })?;
        Self::new(api_key)
    }
}

impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError> {
        let resp = self
            .client
            .post(format!("{}/{}", self.base_url, request.voice_id))
            .query(&[("output_format", request.format.output_format())])
            .header("xi-api-key", &self.api_key)
            .json(&serde_json::json!({
                "text": request.text,
                "model_id": request.model_id,
            }))
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TtsError::Api { status, message });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
