pub mod fetcher;
pub mod llm;
pub mod media;
pub mod transcripts;
pub mod tts;
