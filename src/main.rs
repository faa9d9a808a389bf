mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SelectionArgs};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use trackextract::adapter::DependencyStatus;
use trackextract::analyzer::AnalysisSummary;
use trackextract::config::AppConfig;
use trackextract::service::BatchOptions;
use trackextract::utils::init_logging;
use trackextract::{
    BatchResult, ExtractionFilters, ExtractionResult, ExtractionService, ProgressEvent,
    ProgressSink, ThrottledSink, TrackExtractionResult, language,
};
use uuid::Uuid;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };

    let _guard = init_logging(&config.logging, cli.verbose);
    tracing::debug!("Running with config: {:?}", config);

    let success = run(&cli, &config)?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run(cli: &Cli, config: &AppConfig) -> Result<bool> {
    let progress = cli.progress.then(|| {
        progress_printer(
            Uuid::new_v4().to_string(),
            ProgressStream::for_output(cli.json),
        )
    });

    match &cli.command {
        Commands::Analyze { file } => {
            let mut service = ExtractionService::from_config(config);
            let summary = service
                .analyze(file)
                .with_context(|| format!("Failed to analyze {}", file.display()))?;
            output(cli, &summary, print_summary)?;
            Ok(true)
        }

        Commands::Extract { file, selection } => {
            let mut service = ExtractionService::from_config(config);
            let result = service.extract_tracks(
                file,
                &output_dir(config, selection.output.as_ref()),
                &filters(config, selection),
                progress,
            );
            output(cli, &result, print_extraction)?;
            Ok(result.success)
        }

        Commands::Track {
            file,
            track_type,
            id,
            output: out,
            remove_letterbox,
        } => {
            let mut service = ExtractionService::from_config(config);
            let result = service.extract_specific_track(
                file,
                &output_dir(config, out.as_ref()),
                track_type,
                *id,
                *remove_letterbox || config.extraction.remove_letterbox,
                progress,
            );
            output(cli, &result, print_track)?;
            Ok(result.success)
        }

        Commands::Batch {
            paths,
            selection,
            flat,
            jobs,
        } => {
            let options = BatchOptions {
                organize_by_filename: !flat && config.extraction.organize_by_filename,
                concurrency: jobs.unwrap_or(config.extraction.concurrency),
            };
            let mut service = ExtractionService::from_config(config);
            let result = service.batch_extract(
                paths.as_slice(),
                &output_dir(config, selection.output.as_ref()),
                &filters(config, selection),
                &options,
                progress,
            );
            output(cli, &result, print_batch)?;
            Ok(result.success())
        }

        Commands::Languages => {
            let languages: Vec<_> = language::supported_languages()
                .into_iter()
                .map(|(code, name)| json!({ "code": code, "name": name }))
                .collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                for (code, name) in language::supported_languages() {
                    println!("{:<5} {}", code, name);
                }
            }
            Ok(true)
        }

        Commands::Check => {
            let status = DependencyStatus::check(&config.tools);
            output(cli, &status, |status| {
                for tool in [&status.ffmpeg, &status.ffprobe] {
                    match (&tool.path, &tool.version) {
                        (Some(path), Some(version)) if tool.available => {
                            println!("{:<8} ok       {} ({})", tool.name, version, path.display())
                        }
                        _ => println!("{:<8} missing", tool.name),
                    }
                }
            })?;
            Ok(status.all_available())
        }
    }
}

/// Where progress lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressStream {
    Stdout,
    Stderr,
}

impl ProgressStream {
    /// Stdout carries the JSON result document in `--json` mode
    fn for_output(json: bool) -> Self {
        if json { Self::Stderr } else { Self::Stdout }
    }
}

fn progress_line(operation_id: &str, event: &ProgressEvent) -> String {
    let payload = json!({
        "operation_id": operation_id,
        "event": event,
        "args": event.to_args(),
    });
    format!("PROGRESS:{}", payload)
}

/// Print `PROGRESS:{json}` lines, dropping back-to-back duplicates
fn progress_printer(operation_id: String, stream: ProgressStream) -> ProgressSink {
    let printer: ProgressSink = Arc::new(move |event: &ProgressEvent| {
        let line = progress_line(&operation_id, event);
        match stream {
            ProgressStream::Stdout => println!("{}", line),
            ProgressStream::Stderr => eprintln!("{}", line),
        }
    });
    ThrottledSink::new(printer).into_sink()
}

fn output<T: Serialize>(cli: &Cli, value: &T, human: impl Fn(&T)) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn output_dir(config: &AppConfig, requested: Option<&PathBuf>) -> PathBuf {
    requested
        .cloned()
        .unwrap_or_else(|| config.extraction.output_directory.clone())
}

fn filters(config: &AppConfig, selection: &SelectionArgs) -> ExtractionFilters {
    let languages = if selection.languages.is_empty() {
        config.extraction.default_languages.clone()
    } else {
        selection.languages.clone()
    };
    for token in languages.iter().filter(|t| !language::is_known_code(t)) {
        tracing::warn!("Unknown language '{}', matching it verbatim", token);
    }
    ExtractionFilters {
        audio_only: selection.audio_only,
        subtitle_only: selection.subtitle_only,
        video_only: selection.video_only,
        include_video: selection.include_video,
        remove_letterbox: selection.remove_letterbox || config.extraction.remove_letterbox,
        ..ExtractionFilters::new(languages)
    }
}

fn print_summary(summary: &AnalysisSummary) {
    println!("{}", summary.file.display());
    println!(
        "  {} audio, {} subtitle, {} video tracks",
        summary.audio_tracks, summary.subtitle_tracks, summary.video_tracks
    );
    for track in &summary.tracks {
        println!("  [{}] {}", track.track_type, track.display);
    }
}

fn print_extraction(result: &ExtractionResult) {
    for path in &result.output_paths {
        println!("  {}", path.display());
    }
    println!(
        "{}: {} audio, {} subtitle, {} video tracks extracted",
        result.file.display(),
        result.extracted_audio,
        result.extracted_subtitles,
        result.extracted_video
    );
    if let Some(error) = &result.error {
        eprintln!("Error: {}", error);
    }
}

fn print_track(result: &TrackExtractionResult) {
    match (&result.output_path, &result.error) {
        (Some(path), _) => println!("{}", path.display()),
        (None, Some(error)) => eprintln!("Error: {}", error),
        (None, None) => eprintln!("Error: nothing extracted"),
    }
}

fn print_batch(result: &BatchResult) {
    if let Some(error) = &result.error {
        eprintln!("Error: {}", error);
        return;
    }
    println!(
        "{}/{} files succeeded, {} tracks extracted ({} audio, {} subtitle, {} video) in {}s",
        result.successful_files,
        result.total_files,
        result.extracted_tracks,
        result.extracted_audio,
        result.extracted_subtitles,
        result.extracted_video,
        (result.finished_at - result.started_at).num_seconds()
    );
    for failure in &result.failures {
        eprintln!("  failed: {}: {}", failure.file.display(), failure.error);
    }
}
