use std::path::{Path, PathBuf};

use crate::{
    error::VideoAssemblyError,
    media::{AudioProbe, Clip, VideoEncoder},
    render::{SlideRenderer, TemplateSettings, decode_slide_image, save_frame},
    types::Slide,
};

/// Silence appended after each slide's narration.
pub const PAUSE_SECONDS: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct VideoJob {
    pub slides: Vec<Slide>,
    pub audio_paths: Vec<PathBuf>,
    /// Base64 images captured by the caller, by slide position.
    pub slide_images: Vec<Option<String>>,
    pub settings: TemplateSettings,
    pub output_path: PathBuf,
}

/// Keep only the final path component of each entry (a bare name or an `/audio/{file}` URL)
/// and join it onto `audio_dir`.
pub fn resolve_audio_paths<S: AsRef<str>>(audio_dir: &Path, entries: &[S]) -> Vec<PathBuf> {
    entries
        .iter()
        .map(|entry| {
            let name = entry
                .as_ref()
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or_default();
            audio_dir.join(name)
        })
        .collect()
}

pub struct VideoAssembler<P, E> {
    probe: P,
    encoder: E,
    renderer: SlideRenderer,
}

impl<P, E> VideoAssembler<P, E>
where
    P: AudioProbe,
    E: VideoEncoder,
{
    pub fn new(probe: P, encoder: E, renderer: SlideRenderer) -> Self {
        Self {
            probe,
            encoder,
            renderer,
        }
    }

    /// `Ok(None)` when no slide had an audio file to pair with.
    #[tracing::instrument(skip_all, fields(output = %job.output_path.display()))]
    pub async fn assemble(&self, job: &VideoJob) -> Result<Option<PathBuf>, VideoAssemblyError> {
        let frames = tempfile::tempdir()?;
        let (width, height) = self.renderer.dimensions();
        let mut clips = Vec::new();

        for (index, (slide, audio_path)) in job.slides.iter().zip(&job.audio_paths).enumerate() {
            let is_file = tokio::fs::metadata(audio_path)
                .await
                .is_ok_and(|meta| meta.is_file());
            if !is_file {
                tracing::warn!(index, path = %audio_path.display(), "Audio file not found, skipping slide");
                continue;
            }

            let image = match job.slide_images.get(index).and_then(Option::as_deref) {
                Some(payload) if !payload.trim().is_empty() => {
                    tracing::debug!(index, "Using captured slide image");
                    decode_slide_image(payload, width, height)
                        .map_err(|reason| VideoAssemblyError::InvalidImage { index, reason })?
                }
                _ => self.renderer.render(slide, &job.settings),
            };

            let image_path = frames.path().join(format!("slide_{index:03}.png"));
            save_frame(&image, &image_path)?;

            let duration_seconds = self.probe.duration_seconds(audio_path).await + PAUSE_SECONDS;
            clips.push(Clip {
                image_path,
                audio_path: audio_path.clone(),
                duration_seconds,
            });
        }

        if clips.is_empty() {
            tracing::warn!("No slide had a usable audio file");
            return Ok(None);
        }

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(clips = clips.len(), "Encoding video");
        self.encoder.encode(&clips, &job.output_path).await?;

        Ok(Some(job.output_path.clone()))
    }
}
