use std::{
    ffi::OsString,
    future::Future,
    path::{Path, PathBuf},
};

use tokio::process::Command;

use crate::error::VideoAssemblyError;

pub const FPS: u32 = 24;
pub const TRANSITION_SECONDS: f64 = 0.8;

pub trait AudioProbe {
    /// Length of the audio file in seconds, or 0 when it cannot be read.
    fn duration_seconds(&self, path: &Path) -> impl Future<Output = f64>;
}

pub trait VideoEncoder {
    fn encode(
        &self,
        clips: &[Clip],
        output: &Path,
    ) -> impl Future<Output = Result<(), VideoAssemblyError>>;
}

/// One still image shown for `duration_seconds` with its narration underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub image_path: PathBuf,
    pub audio_path: PathBuf,
    pub duration_seconds: f64,
}

/// Crossfade length, shortened so no clip is consumed entirely by its transitions.
pub fn transition_seconds(clips: &[Clip]) -> f64 {
    clips
        .iter()
        .map(|c| c.duration_seconds / 2.0)
        .fold(TRANSITION_SECONDS, f64::min)
}

/// Filter graph chaining `xfade` over the images and `acrossfade` over the padded narration.
/// Inputs are expected as image/audio pairs: clip `i` uses inputs `2i` and `2i + 1`.
pub fn build_filter_graph(clips: &[Clip], width: u32, height: u32, fps: u32) -> String {
    let transition = transition_seconds(clips);
    let mut filters = Vec::new();

    for (i, clip) in clips.iter().enumerate() {
        filters.push(format!(
            "[{video}:v]scale={width}:{height},setsar=1,format=yuv420p,fps={fps}[v{i}]",
            video = 2 * i,
        ));
        filters.push(format!(
            "[{audio}:a]apad=whole_dur={duration:.3},atrim=0:{duration:.3}[a{i}]",
            audio = 2 * i + 1,
            duration = clip.duration_seconds,
        ));
    }

    let mut video_label = "v0".to_string();
    let mut audio_label = "a0".to_string();
    let mut elapsed = 0.0;

    for (k, clip) in clips.iter().enumerate().skip(1) {
        elapsed += clips[k - 1].duration_seconds;
        let offset = elapsed - k as f64 * transition;

        filters.push(format!(
            "[{video_label}][v{k}]xfade=transition=fade:duration={transition:.3}:offset={offset:.3}[vx{k}]"
        ));
        filters.push(format!(
            "[{audio_label}][a{k}]acrossfade=d={transition:.3}[ax{k}]"
        ));
        video_label = format!("vx{k}");
        audio_label = format!("ax{k}");
        tracing::trace!(k, offset, duration = clip.duration_seconds, "Crossfade planned");
    }

    filters.push(format!("[{video_label}]null[vout]"));
    filters.push(format!("[{audio_label}]anull[aout]"));
    filters.join(";")
}

pub fn build_ffmpeg_args(
    clips: &[Clip],
    output: &Path,
    width: u32,
    height: u32,
    fps: u32,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-hide_banner".into()];

    for clip in clips {
        args.extend([
            "-loop".into(),
            "1".into(),
            "-t".into(),
            format!("{:.3}", clip.duration_seconds).into(),
            "-i".into(),
            clip.image_path.clone().into_os_string(),
            "-i".into(),
            clip.audio_path.clone().into_os_string(),
        ]);
    }

    let graph = build_filter_graph(clips, width, height, fps);
    let rate = fps.to_string();
    args.extend(
        [
            "-filter_complex",
            graph.as_str(),
            "-map",
            "[vout]",
            "-map",
            "[aout]",
            "-r",
            rate.as_str(),
            "-c:v",
            "libx264",
            "-preset",
            "medium",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-threads",
            "4",
        ]
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Exact WAV length from the header.
pub fn wav_duration_seconds(path: &Path) -> Result<f64, hound::Error> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
}

/// `ffmpeg`/`ffprobe` driven through child processes.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            width: 1920,
            height: 1080,
            fps: FPS,
        }
    }
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binaries(mut self, ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    async fn probe_with_ffprobe(&self, path: &Path) -> Option<f64> {
        let output = Command::new(&self.ffprobe)
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("default=noprint_wrappers=1:nokey=1")
            .arg(path)
            .output()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to run ffprobe"))
            .ok()?;

        if !output.status.success() {
            tracing::warn!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ffprobe could not read audio file"
            );
            return None;
        }

        String::from_utf8_lossy(&output.stdout).trim().parse().ok()
    }
}

impl AudioProbe for Ffmpeg {
    async fn duration_seconds(&self, path: &Path) -> f64 {
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

        let duration = if is_wav {
            wav_duration_seconds(path)
                .inspect_err(|e| tracing::warn!(error = %e, path = %path.display(), "Unreadable WAV file"))
                .ok()
        } else {
            self.probe_with_ffprobe(path).await
        };

        duration.filter(|d| d.is_finite() && *d >= 0.0).unwrap_or(0.0)
    }
}

impl VideoEncoder for Ffmpeg {
    async fn encode(&self, clips: &[Clip], output: &Path) -> Result<(), VideoAssemblyError> {
        let args = build_ffmpeg_args(clips, output, self.width, self.height, self.fps);
        tracing::debug!(clips = clips.len(), output = %output.display(), "Running ffmpeg");

        let result = Command::new(&self.ffmpeg).args(&args).output().await?;

        if !result.status.success() {
            return Err(VideoAssemblyError::EncodeFailed {
                output: output.to_path_buf(),
                reason: String::from_utf8_lossy(&result.stderr).to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(n: usize, duration_seconds: f64) -> Clip {
        Clip {
            image_path: PathBuf::from(format!("/tmp/slide_{n}.png")),
            audio_path: PathBuf::from(format!("/tmp/slide_{n}.mp3")),
            duration_seconds,
        }
    }

    #[test]
    fn transition_shrinks_for_short_clips() {
        assert_eq!(transition_seconds(&[clip(0, 5.0), clip(1, 4.0)]), 0.8);
        assert_eq!(transition_seconds(&[clip(0, 5.0), clip(1, 1.0)]), 0.5);
    }

    #[test]
    fn crossfade_offsets_account_for_overlap() {
        let graph = build_filter_graph(&[clip(0, 3.0), clip(1, 4.0), clip(2, 5.0)], 1920, 1080, 24);

        assert!(graph.contains("[v0][v1]xfade=transition=fade:duration=0.800:offset=2.200[vx1]"));
        assert!(graph.contains("[vx1][v2]xfade=transition=fade:duration=0.800:offset=5.400[vx2]"));
        assert!(graph.contains("[a0][a1]acrossfade=d=0.800[ax1]"));
        assert!(graph.contains("[3:a]apad=whole_dur=4.000,atrim=0:4.000[a1]"));
        assert!(graph.ends_with("[vx2]null[vout];[ax2]anull[aout]"));
    }

    #[test]
    fn narration_is_cut_to_its_clip_length() {
        let graph = build_filter_graph(&[clip(0, 0.5), clip(1, 2.0)], 1920, 1080, 24);

        assert!(graph.contains("[1:a]apad=whole_dur=0.500,atrim=0:0.500[a0]"));
        assert!(graph.contains("[a0][a1]acrossfade=d=0.250[ax1]"));
        assert!(graph.contains("xfade=transition=fade:duration=0.250:offset=0.250[vx1]"));
    }

    #[test]
    fn single_clip_has_no_transitions() {
        let graph = build_filter_graph(&[clip(0, 2.5)], 1920, 1080, 24);

        assert!(!graph.contains("xfade"));
        assert!(graph.contains("[v0]null[vout]"));
    }

    #[test]
    fn args_pair_images_with_audio_and_fix_the_codecs() {
        let args = build_ffmpeg_args(
            &[clip(0, 2.0), clip(1, 3.0)],
            Path::new("/out/presentation.mp4"),
            1920,
            1080,
            24,
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let inputs: Vec<&str> = args
            .windows(2)
            .filter(|w| w[0] == "-i")
            .map(|w| w[1].as_str())
            .collect();
        assert_eq!(
            inputs,
            vec!["/tmp/slide_0.png", "/tmp/slide_0.mp3", "/tmp/slide_1.png", "/tmp/slide_1.mp3"]
        );
        for expected in ["libx264", "aac", "medium", "yuv420p"] {
            assert!(args.iter().any(|a| a == expected), "missing {expected}");
        }
        assert_eq!(args.last().map(String::as_str), Some("/out/presentation.mp4"));
    }

    #[test]
    fn reads_wav_duration_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..12_000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert_eq!(wav_duration_seconds(&path).unwrap(), 1.5);
    }

    #[tokio::test]
    async fn unreadable_audio_probes_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"not a wav").unwrap();

        assert_eq!(Ffmpeg::new().duration_seconds(&path).await, 0.0);
    }
}
