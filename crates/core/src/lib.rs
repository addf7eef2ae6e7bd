pub mod classify;
pub mod error;
pub mod extract;
pub mod format;
pub mod llm;
pub mod media;
pub mod narrate;
pub mod output;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod slides;
pub mod summarize;
pub mod text;
pub mod tts;
pub mod types;
pub mod video;

pub use classify::{classify_url, extract_video_id};
pub use error::{
    ExtractionError, FetchError, LlmError, NarrationError, Result, SlidecastError, TtsError,
    VideoAssemblyError,
};
pub use extract::{HttpFetcher, PageFetcher, TranscriptSource, YoutubeTranscripts};
pub use format::{format_narration_readable, format_presentation_readable, format_timestamp};
pub use llm::{ChatClient, CompletionClient, CompletionRequest};
pub use media::{AudioProbe, Clip, Ffmpeg, VideoEncoder};
pub use narrate::{NarratedSlide, NarrationOptions, NarrationResult, Narrator};
pub use output::{
    audio_dir, default_output_root, load_narration, load_presentation, load_slides,
    presentation_path, save_narration, save_presentation, video_output_path,
};
pub use pipeline::Pipeline;
pub use provider::{ELEVENLABS, Provider, ProviderConfig, ProviderError};
pub use render::{Palette, SlideRenderer, TemplateSettings};
pub use tts::{AudioFormat, ElevenLabsClient, SpeechRequest, SpeechSynthesizer};
pub use types::{PresentationResult, Slide, SlideKind, SourceKind};
pub use video::{VideoAssembler, VideoJob, resolve_audio_paths};
