use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use slidecast_core::{
    AudioFormat, ChatClient, ElevenLabsClient, Ffmpeg, HttpFetcher, NarrationOptions, Narrator,
    Palette, Pipeline, Provider, SlideRenderer, TemplateSettings, VideoAssembler, VideoJob,
    YoutubeTranscripts, audio_dir, classify_url, default_output_root, extract_video_id,
    format_narration_readable, format_presentation_readable, load_narration, load_slides,
    output::narration_path, presentation_path, resolve_audio_paths, save_narration,
    save_presentation, video_output_path,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliAudioFormat {
    #[default]
    Mp3,
    Wav,
}

impl From<CliAudioFormat> for AudioFormat {
    fn from(cli: CliAudioFormat) -> Self {
        match cli {
            CliAudioFormat::Mp3 => AudioFormat::Mp3,
            CliAudioFormat::Wav => AudioFormat::Wav,
        }
    }
}

#[derive(Parser)]
#[command(name = "slidecast")]
#[command(
    about = "Turn YouTube videos and articles into slide decks, narrate them, and export MP4 videos"
)]
struct Cli {
    /// Root directory for generated presentations, audio and video
    #[arg(long, global = true, env = "SLIDECAST_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a slide deck from a video or article URL
    Generate {
        url: String,

        /// Target number of slides, title and closing included
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        slides: Option<u32>,

        /// AI provider for summarization
        #[arg(short, long, default_value = "gemini")]
        provider: CliProvider,

        /// Override the provider's default model
        #[arg(short, long)]
        model: Option<String>,

        /// Caption languages to try, in order of preference
        #[arg(short, long = "lang", default_values_t = ["en".to_string()])]
        languages: Vec<String>,

        /// Print the raw JSON result instead of the readable summary
        #[arg(long)]
        json: bool,
    },

    /// Write and synthesize narration for every slide
    Narrate {
        /// Saved presentation or slide list (JSON)
        input: PathBuf,

        /// ElevenLabs voice id
        #[arg(long)]
        voice: Option<String>,

        #[arg(short, long, default_value = "mp3")]
        format: CliAudioFormat,

        /// Approximate narration length per slide
        #[arg(long, default_value_t = 90)]
        target_words: u32,

        /// Crossfade between slides, echoed in the result
        #[arg(long, default_value_t = 400)]
        transition_ms: u32,

        /// Language model used to write the narration
        #[arg(short, long)]
        model: Option<String>,

        /// ElevenLabs speech model
        #[arg(long)]
        model_id: Option<String>,

        /// AI provider for narration text
        #[arg(short, long, default_value = "gemini")]
        provider: CliProvider,
    },

    /// Render slides and narration into an MP4
    Export {
        /// Saved presentation or slide list (JSON)
        input: PathBuf,

        /// Narration result produced by `narrate`
        #[arg(long, required_unless_present = "audio", conflicts_with = "audio")]
        narration: Option<PathBuf>,

        /// Audio files (names or /audio/ URLs) in slide order
        #[arg(long, num_args = 1..)]
        audio: Vec<String>,

        /// JSON array of base64 slide images, null for slides to render
        #[arg(long)]
        images: Option<PathBuf>,

        /// modern, vibrant, sunset, nature or glass
        #[arg(short, long, default_value = "modern")]
        template: String,

        /// JSON colour palette
        #[arg(long)]
        colors: Option<PathBuf>,

        /// TrueType font for slide text, instead of the first system font found
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Show whether a URL is treated as a video or an article
    Detect { url: String },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,slidecast=debug,slidecast_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

fn print_header(subtitle: &str) {
    println!(
        "\n{}  {}\n",
        style("slidecast").cyan().bold(),
        style(subtitle).dim()
    );
}

fn chat_client(provider: Provider, model: Option<String>) -> ChatClient {
    match ChatClient::new(provider) {
        Ok(client) => match model {
            Some(model) => client.with_model(model),
            None => client,
        },
        Err(e) => fail(e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.output_dir.unwrap_or_else(default_output_root);
    tracing::debug!(root = %root.display(), "Output root");

    match cli.command {
        Command::Generate {
            url,
            slides,
            provider,
            model,
            languages,
            json,
        } => {
            generate(&root, &url, slides, provider.into(), model, languages, json).await
        }
        Command::Narrate {
            input,
            voice,
            format,
            target_words,
            transition_ms,
            model,
            model_id,
            provider,
        } => {
            let options = NarrationOptions {
                voice: voice.unwrap_or_default(),
                audio_format: format.into(),
                target_words,
                transition_ms,
                model,
                model_id,
            };
            narrate(&root, &input, provider.into(), options).await
        }
        Command::Export {
            input,
            narration,
            audio,
            images,
            template,
            colors,
            font,
        } => {
            let job = ExportJob {
                input,
                narration,
                audio,
                images,
                template,
                colors,
                font,
            };
            export(&root, job).await
        }
        Command::Detect { url } => {
            detect(&url);
            Ok(())
        }
    }
}

async fn generate(
    root: &Path,
    url: &str,
    slides: Option<u32>,
    provider: Provider,
    model: Option<String>,
    languages: Vec<String>,
    json: bool,
) -> Result<()> {
    let llm = chat_client(provider, model);
    let model_name = llm.model().to_string();
    let transcripts = YoutubeTranscripts::new().with_languages(languages);
    let pipeline = Pipeline::new(llm, transcripts, HttpFetcher::new()?);

    if !json {
        print_header("Presentation Generator");
    }

    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Generating presentation with {} ({})...",
        provider.name(),
        model_name
    ));
    let result = pipeline
        .process_url(url, slides.map(|n| n as usize))
        .await;
    let mark = if result.success {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    spinner.finish_with_message(format!(
        "{} {} slides from {} {}",
        mark,
        result.slides.len(),
        result.url_type.as_str(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    let saved = presentation_path(root);
    save_presentation(&result, &saved).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "\n{} {}\n",
            style("Saved:").dim(),
            style(saved.display()).cyan()
        );
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", format_presentation_readable(&result));
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn narrate(
    root: &Path,
    input: &Path,
    provider: Provider,
    options: NarrationOptions,
) -> Result<()> {
    let slides = load_slides(input)
        .await
        .with_context(|| format!("Failed to read slides from {}", input.display()))?;

    let tts = ElevenLabsClient::from_env().unwrap_or_else(|e| fail(e));
    let llm = chat_client(provider, None);
    let narrator = Narrator::new(llm, tts, Ffmpeg::new(), audio_dir(root));

    print_header("Narrator");

    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Narrating {} slides...", slides.len()));
    let result = match narrator.narrate(&slides, &options).await {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_and_clear();
            fail(e);
        }
    };
    spinner.finish_with_message(format!(
        "{} Narrated {} slides {}",
        style("✓").green().bold(),
        result.slides.len(),
        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
    ));

    let saved = narration_path(root);
    save_narration(&result, &saved).await?;

    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(saved.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", format_narration_readable(&result));
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

struct ExportJob {
    input: PathBuf,
    narration: Option<PathBuf>,
    audio: Vec<String>,
    images: Option<PathBuf>,
    template: String,
    colors: Option<PathBuf>,
    font: Option<PathBuf>,
}

async fn export(root: &Path, job: ExportJob) -> Result<()> {
    let ExportJob {
        input,
        narration,
        audio,
        images,
        template,
        colors,
        font,
    } = job;
    let slides = load_slides(&input)
        .await
        .with_context(|| format!("Failed to read slides from {}", input.display()))?;

    let audio_names = match narration {
        Some(path) => load_narration(&path)
            .await?
            .slides
            .into_iter()
            .map(|slide| slide.audio_file)
            .collect(),
        None => audio,
    };
    let slide_images = match images {
        Some(path) => read_json::<Vec<Option<String>>>(&path).await?,
        None => Vec::new(),
    };
    let colors = match colors {
        Some(path) => read_json::<Palette>(&path).await?,
        None => Palette::default(),
    };

    let job = VideoJob {
        slides,
        audio_paths: resolve_audio_paths(&audio_dir(root), &audio_names),
        slide_images,
        settings: TemplateSettings { template, colors },
        output_path: video_output_path(root),
    };

    print_header("Video Export");

    let renderer = match font {
        Some(path) => SlideRenderer::discover().with_font_file(&path),
        None => SlideRenderer::discover(),
    };
    let (width, height) = renderer.dimensions();
    let encoder = Ffmpeg::new().with_canvas(width, height);
    let assembler = VideoAssembler::new(Ffmpeg::new(), encoder, renderer);
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Encoding {} slides...", job.slides.len()));
    let output = assembler.assemble(&job).await;
    spinner.finish_and_clear();

    match output? {
        Some(path) => {
            println!(
                "{} Video exported {}",
                style("✓").green().bold(),
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            );
            println!(
                "\n{} {}\n",
                style("Saved:").dim(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        None => bail!("Video generation failed"),
    }
}

fn detect(url: &str) {
    let kind = classify_url(url);
    println!("{} {}", style("Type:").dim(), style(kind.as_str()).yellow());
    if let Some(id) = extract_video_id(url) {
        println!("{} {}", style("Video ID:").dim(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_read_naturally() {
        assert_eq!(format_duration(Duration::from_millis(4_300)), "4.3s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn cli_rejects_zero_slides_and_conflicting_audio_sources() {
        assert!(Cli::try_parse_from(["slidecast", "generate", "https://x.dev", "-n", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["slidecast", "export", "deck.json"]).is_err(),
            "export needs narration or audio"
        );
        assert!(
            Cli::try_parse_from([
                "slidecast",
                "export",
                "deck.json",
                "--narration",
                "n.json",
                "--audio",
                "a.mp3"
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["slidecast", "export", "deck.json", "--audio", "a.mp3", "b.mp3"])
                .is_ok()
        );
    }

    #[test]
    fn caption_languages_default_to_english() {
        let cli = Cli::try_parse_from(["slidecast", "generate", "https://youtu.be/x"]).unwrap();
        let Command::Generate { languages, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(languages, vec!["en".to_string()]);

        let cli = Cli::try_parse_from([
            "slidecast",
            "generate",
            "https://youtu.be/x",
            "--lang",
            "de",
            "-l",
            "en",
        ])
        .unwrap();
        let Command::Generate { languages, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(languages, vec!["de".to_string(), "en".to_string()]);
    }

    #[test]
    fn export_accepts_a_font_override() {
        let cli = Cli::try_parse_from([
            "slidecast",
            "export",
            "deck.json",
            "--audio",
            "a.mp3",
            "--font",
            "/fonts/Inter.ttf",
        ])
        .unwrap();
        let Command::Export { font, .. } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(font, Some(PathBuf::from("/fonts/Inter.ttf")));
    }
}
