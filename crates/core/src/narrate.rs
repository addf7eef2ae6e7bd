use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::NarrationError,
    llm::{CompletionClient, CompletionRequest},
    media::AudioProbe,
    provider::ELEVENLABS,
    text::collapse_whitespace,
    tts::{AudioFormat, SpeechRequest, SpeechSynthesizer},
    types::Slide,
};

const TEMPERATURE: f32 = 0.4;

fn default_target_words() -> u32 {
    90
}

fn default_transition_ms() -> u32 {
    400
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationOptions {
    /// Voice id; empty selects the default voice.
    #[serde(default)]
    pub voice: String,
    #[serde(default)]
    pub audio_format: AudioFormat,
    #[serde(default = "default_target_words")]
    pub target_words: u32,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u32,
    /// Language model used to write the narration.
    #[serde(default)]
    pub model: Option<String>,
    /// Speech model used for synthesis.
    #[serde(default)]
    pub model_id: Option<String>,
}

impl Default for NarrationOptions {
    fn default() -> Self {
        Self {
            voice: String::new(),
            audio_format: AudioFormat::default(),
            target_words: default_target_words(),
            transition_ms: default_transition_ms(),
            model: None,
            model_id: None,
        }
    }
}

impl NarrationOptions {
    fn voice_id(&self) -> &str {
        match self.voice.trim() {
            "" => ELEVENLABS.voice_id,
            voice => voice,
        }
    }

    fn speech_model(&self) -> &str {
        self.model_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(ELEVENLABS.model_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratedSlide {
    pub slide_index: usize,
    pub title: String,
    pub narration_text: String,
    pub audio_file: String,
    pub audio_url: String,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationResult {
    pub slides: Vec<NarratedSlide>,
    pub total_duration_seconds: f64,
    pub transition_ms: u32,
}

pub fn build_narration_prompt(slide: &Slide, target_words: u32) -> String {
    format!(
        r#"You are a professional narrator. Write a spoken narration for one presentation slide.

Slide title: {title}
Slide subtitle: {subtitle}
Slide content: {content}

Guidelines:
- Sound natural and conversational
- 1 slide only; do not mention other slides
- Target length: about {target_words} words
- Avoid lists; use sentences
- Do not include markdown or bullet symbols
- End with a complete sentence

Return only the narration text."#,
        title = slide.title,
        subtitle = slide.subtitle_text(),
        content = slide.content_text(),
    )
}

/// `slide_{n}_{unix}_{suffix}.{ext}` with a 1-based slide number.
pub fn audio_file_name(index: usize, format: AudioFormat) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "slide_{}_{}_{}.{}",
        index + 1,
        timestamp,
        &suffix[..8],
        format.extension()
    )
}

/// Writes one narrated audio file per slide into `audio_dir`.
pub struct Narrator<L, S, P> {
    llm: L,
    tts: S,
    probe: P,
    audio_dir: PathBuf,
}

impl<L, S, P> Narrator<L, S, P>
where
    L: CompletionClient,
    S: SpeechSynthesizer,
    P: AudioProbe,
{
    pub fn new(llm: L, tts: S, probe: P, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            llm,
            tts,
            probe,
            audio_dir: audio_dir.into(),
        }
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    /// Strictly one slide after another. The first failure aborts the whole run.
    #[tracing::instrument(skip(self, slides, options), fields(slides = slides.len()))]
    pub async fn narrate(
        &self,
        slides: &[Slide],
        options: &NarrationOptions,
    ) -> Result<NarrationResult, NarrationError> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;

        let mut narrated = Vec::with_capacity(slides.len());
        let mut total_duration_seconds = 0.0;

        for (index, slide) in slides.iter().enumerate() {
            let request = CompletionRequest::new(
                build_narration_prompt(slide, options.target_words),
                TEMPERATURE,
            )
            .with_model(options.model.clone());

            let response = self
                .llm
                .complete(&request)
                .await
                .map_err(|source| NarrationError::Narration { index, source })?;
            let narration_text = collapse_whitespace(&response);

            let audio = self
                .tts
                .synthesize(&SpeechRequest {
                    text: narration_text.clone(),
                    voice_id: options.voice_id().to_string(),
                    model_id: options.speech_model().to_string(),
                    format: options.audio_format,
                })
                .await
                .map_err(|source| NarrationError::Synthesis { index, source })?;

            let audio_file = audio_file_name(index, options.audio_format);
            let path = self.audio_dir.join(&audio_file);
            tokio::fs::write(&path, &audio).await?;

            let duration_seconds = self.probe.duration_seconds(&path).await;
            total_duration_seconds += duration_seconds;

            tracing::info!(index, duration_seconds, file = %audio_file, "Slide narrated");

            narrated.push(NarratedSlide {
                slide_index: index,
                title: slide.title.clone(),
                narration_text,
                audio_url: format!("/audio/{audio_file}"),
                audio_file,
                duration_seconds,
            });
        }

        Ok(NarrationResult {
            slides: narrated,
            total_duration_seconds,
            transition_ms: options.transition_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_file_names_are_one_based_and_unique() {
        let first = audio_file_name(0, AudioFormat::Mp3);
        let second = audio_file_name(0, AudioFormat::Mp3);

        assert!(first.starts_with("slide_1_"));
        assert!(first.ends_with(".mp3"));
        assert_ne!(first, second);
        assert!(audio_file_name(4, AudioFormat::Wav).starts_with("slide_5_"));
    }

    #[test]
    fn prompt_includes_slide_fields_and_length() {
        let slide = Slide::content("Borrowing", "References never outlive their owner.", 3);
        let prompt = build_narration_prompt(&slide, 120);

        assert!(prompt.contains("Slide title: Borrowing"));
        assert!(prompt.contains("Slide subtitle: \n"));
        assert!(prompt.contains("Slide content: References never outlive their owner."));
        assert!(prompt.contains("about 120 words"));
    }

    #[test]
    fn options_fall_back_to_default_voice_and_model() {
        let options: NarrationOptions = serde_json::from_str(r#"{"voice": "  "}"#).unwrap();

        assert_eq!(options.voice_id(), ELEVENLABS.voice_id);
        assert_eq!(options.speech_model(), ELEVENLABS.model_id);
        assert_eq!(options.target_words, 90);
        assert_eq!(options.transition_ms, 400);
        assert_eq!(options.audio_format, AudioFormat::Mp3);
    }
}
