// Submit a video to the subtitle service, wait for the job, and optionally download the
// subtitled video and transcript it produced.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use clap::Parser;
use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use tokio::io::AsyncWriteExt;
use tracing::error;

use subtitler::fonts::fetch_fonts;
use subtitler::{ClientConfig, Controller, Language, SelectedFile, SubmitOutcome};

#[derive(Parser, Debug)]
#[command(name = "subtitler-cli")]
#[command(about = "Submit a video for transcription and subtitle burn-in")]
struct Params {
    /// Origin of the transcription service.
    #[arg(
        long = "origin",
        env = "SUBTITLER_ORIGIN",
        default_value = "http://localhost:8000"
    )]
    origin: String,

    /// Video (or audio) file to submit.
    #[arg(short = 'f', long = "file", required_unless_present = "list_fonts")]
    file: Option<PathBuf>,

    /// Spoken language of the media.
    #[arg(short = 'l', long = "language", value_enum, default_value_t = Language::En)]
    language: Language,

    /// Prompt forwarded to Whisper (names, jargon, spelling hints).
    #[arg(long = "whisper-prompt", default_value = "")]
    whisper_prompt: String,

    /// Skip the service's LLM correction pass.
    #[arg(long = "no-post-processing", default_value_t = false)]
    no_post_processing: bool,

    /// Prompt for the LLM correction pass.
    #[arg(long = "post-processing-prompt", default_value = "")]
    post_processing_prompt: String,

    /// Burn-in font name (see `--list-fonts`).
    #[arg(long = "font")]
    font: Option<String>,

    /// List the fonts the service offers and exit.
    #[arg(long = "list-fonts")]
    list_fonts: bool,

    /// Directory to download the subtitled video and transcript into.
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    subtitler::init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "subtitler-cli failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    let config = ClientConfig::new(&params.origin).context("invalid --origin")?;
    let mut controller = Controller::connect(config);

    if params.list_fonts {
        let catalog = fetch_fonts(controller.transport())
            .await
            .context("failed to fetch font catalogue")?;
        for language in Language::ALL {
            println!("{language}:");
            for font in catalog.fonts_for(language) {
                println!("  - {font}");
            }
        }
        return Ok(());
    }

    let path = params
        .file
        .as_deref()
        .ok_or_else(|| anyhow!("--file is required"))?;
    let file = read_selected_file(path).await?;

    controller.choose_files(vec![file]);
    controller.set_language(params.language);
    controller.set_whisper_prompt(params.whisper_prompt);
    controller.set_post_processing(!params.no_post_processing);
    controller.set_post_processing_prompt(params.post_processing_prompt);
    controller.set_font(params.font);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("transcribing {}", controller.label()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = controller.submit().await;
    spinner.finish_and_clear();

    let result = match outcome {
        SubmitOutcome::Succeeded(result) => result,
        SubmitOutcome::Rejected(err) | SubmitOutcome::Failed(err) => {
            return Err(submit_failure(controller.notice(), &err));
        }
    };

    println!("video:      {}", result.video_location());
    println!("transcript: {}", result.transcript_location());

    if let Some(dir) = params.out_dir {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let client = controller.transport().client();
        for url in [result.video_location(), result.transcript_location()] {
            let dest = dir.join(file_name_from_url(url));
            download(client, url, &dest).await?;
            println!("saved {}", dest.display());
        }
    }

    Ok(())
}

async fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || SelectedFile::from_path(owned))
        .await
        .context("file reader task failed")?
        .with_context(|| format!("failed to read {}", path.display()))
}

/// The message the form would show; the error's detail is already part of it.
fn submit_failure(notice: Option<&str>, err: &subtitler::Error) -> anyhow::Error {
    let message = notice
        .map(str::to_owned)
        .unwrap_or_else(|| err.user_message());
    anyhow!(message)
}

/// Local file name for a downloaded artifact: the URL's last path segment.
fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .unwrap_or("download")
        .to_string()
}

async fn download(client: &reqwest::Client, url: &Url, dest: &Path) -> Result<()> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("GET {url} returned HTTP {status}"));
    }

    let total = response.content_length();
    write_stream_to_path(response.bytes_stream(), total, dest).await
}

/// Stream chunks into `<dest>.part`, then rename into place.
///
/// The `.part` file is removed if anything fails.
async fn write_stream_to_path<S, E>(stream: S, total: Option<u64>, dest: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let tmp_path = PathBuf::from(format!("{}.part", dest.display()));

    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };
    pb.set_message(
        dest.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );

    let result = async {
        let mut stream = std::pin::pin!(stream);
        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .with_context(|| format!("failed to create {}", tmp_path.display()))?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("download interrupted")?;
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }

        file.sync_all().await?;
        drop(file);
        pb.finish_and_clear();

        tokio::fs::rename(&tmp_path, dest)
            .await
            .with_context(|| format!("failed to move into place: {}", dest.display()))?;

        Ok::<(), anyhow::Error>(())
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        pb.finish_and_clear();
    }

    result
}
