use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs;

use crate::{
    error::{Result, SlidecastError},
    narrate::NarrationResult,
    types::{PresentationResult, Slide},
};

pub fn default_output_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("slidecast")
}

/// Generated audio lives here; narration records reference it as `/audio/{file}`.
pub fn audio_dir(root: &Path) -> PathBuf {
    root.join("audio")
}

pub fn video_dir(root: &Path) -> PathBuf {
    root.join("video")
}

pub fn presentations_dir(root: &Path) -> PathBuf {
    root.join("presentations")
}

fn short_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// `presentation_{8 hex}.mp4` under the video directory.
pub fn video_output_path(root: &Path) -> PathBuf {
    video_dir(root).join(format!("presentation_{}.mp4", short_id()))
}

pub fn presentation_path(root: &Path) -> PathBuf {
    presentations_dir(root).join(format!("presentation_{}.json", short_id()))
}

pub fn narration_path(root: &Path) -> PathBuf {
    audio_dir(root).join(format!("narration_{}.json", short_id()))
}

async fn write_pretty<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let pretty_json = serde_json::to_string_pretty(value)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

pub async fn save_presentation(result: &PresentationResult, path: &Path) -> Result<()> {
    write_pretty(result, path).await
}

pub async fn load_presentation(path: &Path) -> Result<PresentationResult> {
    let json_content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json_content)?)
}

pub async fn save_narration(result: &NarrationResult, path: &Path) -> Result<()> {
    write_pretty(result, path).await
}

pub async fn load_narration(path: &Path) -> Result<NarrationResult> {
    let json_content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json_content)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlideFile {
    Presentation { slides: Vec<Slide> },
    Slides(Vec<Slide>),
}

/// Slides from either a saved presentation or a bare slide list.
pub async fn load_slides(path: &Path) -> Result<Vec<Slide>> {
    let json_content = fs::read_to_string(path).await?;
    match serde_json::from_str::<SlideFile>(&json_content) {
        Ok(SlideFile::Presentation { slides } | SlideFile::Slides(slides)) => Ok(slides),
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "Slide file did not parse");
            Err(SlidecastError::UnrecognizedSlides {
                path: path.to_path_buf(),
            })
        }
    }
}
