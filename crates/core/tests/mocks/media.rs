use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use slidecast_core::{AudioProbe, Clip, VideoAssemblyError, VideoEncoder};

#[derive(Clone)]
pub struct MockProbe {
    pub seconds: f64,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockProbe {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl AudioProbe for MockProbe {
    async fn duration_seconds(&self, path: &Path) -> f64 {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.seconds
    }
}

/// What the encoder saw, including the frame sizes read back while the frames still existed.
#[derive(Debug, Clone)]
pub struct EncodeCall {
    pub clips: Vec<Clip>,
    pub output: PathBuf,
    pub frame_sizes: Vec<(u32, u32)>,
}

#[derive(Clone, Default)]
pub struct MockEncoder {
    pub calls: Arc<Mutex<Vec<EncodeCall>>>,
    pub fail_with: Option<String>,
}

impl VideoEncoder for MockEncoder {
    async fn encode(&self, clips: &[Clip], output: &Path) -> Result<(), VideoAssemblyError> {
        let frame_sizes = clips
            .iter()
            .map(|clip| image::image_dimensions(&clip.image_path).unwrap())
            .collect();
        self.calls.lock().unwrap().push(EncodeCall {
            clips: clips.to_vec(),
            output: output.to_path_buf(),
            frame_sizes,
        });
        if let Some(ref msg) = self.fail_with {
            return Err(VideoAssemblyError::EncodeFailed {
                output: output.to_path_buf(),
                reason: msg.clone(),
            });
        }
        Ok(())
    }
}
