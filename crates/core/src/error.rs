use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

/// Failure to obtain source text. Recorded into pipeline state, never raised to the caller.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Could not extract YouTube video ID from URL")]
    MissingVideoId,

    #[error("Failed to extract YouTube transcript: {0}")]
    Transcript(String),

    #[error("Failed to fetch blog content: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Error, Debug)]
pub enum NarrationError {
    #[error("Narration text generation failed for slide {index}: {source}")]
    Narration {
        index: usize,
        #[source]
        source: LlmError,
    },

    #[error("Speech synthesis failed for slide {index}: {source}")]
    Synthesis {
        index: usize,
        #[source]
        source: TtsError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum VideoAssemblyError {
    #[error("Invalid slide image payload for slide {index}: {reason}")]
    InvalidImage { index: usize, reason: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Video encoding failed for {output}: {reason}")]
    EncodeFailed { output: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SlidecastError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unrecognized slide file {path}: expected a presentation or a slide list")]
    UnrecognizedSlides { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, SlidecastError>;
