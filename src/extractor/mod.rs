//! Per-type track extraction.
//!
//! Each track type has an extractor describing its codec extensions and an
//! optional specialised extraction step. The shared algorithm lives in the
//! free functions [`extract_track`] and [`extract_by_language`].

pub mod audio;
pub mod subtitle;
pub mod video;

pub use audio::AudioExtractor;
pub use subtitle::SubtitleExtractor;
pub use video::{VideoExtractor, select_crop};

use crate::adapter::{MediaToolAdapter, StreamRequest};
use crate::analyzer::TrackCatalog;
use crate::error::{AppError, ExtractionFailure, Result};
use crate::progress::ProgressReporter;
use crate::tracks::{Track, TrackType};
use crate::utils::files::{ensure_directory, file_stem};
use humansize::{DECIMAL, format_size};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Key of the fallback entry every extension table must carry
pub const DEFAULT_CODEC: &str = "default";

/// Per-call extraction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Crop black bars from video tracks
    pub remove_letterbox: bool,
    /// Seconds sampled by crop detection
    pub crop_sample_seconds: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            remove_letterbox: false,
            crop_sample_seconds: 60,
        }
    }
}

/// Everything a single extraction step needs
pub struct ExtractionJob<'a> {
    pub adapter: &'a dyn MediaToolAdapter,
    pub input: &'a Path,
    pub output: &'a Path,
    pub track: &'a Track,
    pub options: &'a ExtractOptions,
    /// Input duration from the catalog's probe
    pub duration_secs: Option<f64>,
}

impl ExtractionJob<'_> {
    /// Plain stream copy of the job's track
    pub fn copy_request(&self) -> StreamRequest {
        StreamRequest {
            duration_secs: self.duration_secs,
            ..StreamRequest::copy(self.input, self.output, self.track.track_type, self.track.id)
        }
    }
}

/// One extractor per track type
pub trait TrackExtractor: Send + Sync {
    fn track_type(&self) -> TrackType;

    /// Codec to container extension table, including a `"default"` entry
    fn codec_extensions(&self) -> &'static [(&'static str, &'static str)];

    /// Failure classification tag
    fn error_kind(&self) -> &'static str {
        self.track_type().error_kind()
    }

    fn extension_for(&self, codec: &str) -> &'static str {
        let table = self.codec_extensions();
        let codec = codec.to_lowercase();
        table
            .iter()
            .find(|(name, _)| *name == codec)
            .or_else(|| table.iter().find(|(name, _)| *name == DEFAULT_CODEC))
            .map(|(_, ext)| *ext)
            .unwrap_or("mkv")
    }

    /// Specialised extraction replacing the plain stream copy.
    ///
    /// `None` means the extractor has nothing special to do for this job.
    fn extract_specialized(
        &self,
        _job: &ExtractionJob<'_>,
        _progress: &mut dyn FnMut(f32),
    ) -> Option<Result<()>> {
        None
    }
}

/// Successful outputs and failure reasons of one type's language extraction
#[derive(Debug, Default)]
pub struct TypeExtraction {
    pub paths: Vec<PathBuf>,
    pub failures: Vec<String>,
}

/// One extractor per track type
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractorSet {
    pub audio: AudioExtractor,
    pub subtitle: SubtitleExtractor,
    pub video: VideoExtractor,
}

impl ExtractorSet {
    pub fn get(&self, track_type: TrackType) -> &dyn TrackExtractor {
        match track_type {
            TrackType::Audio => &self.audio,
            TrackType::Subtitle => &self.subtitle,
            TrackType::Video => &self.video,
        }
    }
}

/// Output file name: `{stem}.{type}{id}[.{language}].{extension}`
pub fn output_file_name(input: &Path, track: &Track, extension: &str) -> String {
    let language = track
        .language
        .as_deref()
        .filter(|_| !track.is_undefined_language())
        .map(|l| format!(".{}", l))
        .unwrap_or_default();
    format!(
        "{}.{}{}{}.{}",
        file_stem(input),
        track.track_type,
        track.id,
        language,
        extension
    )
}

fn track_not_found(catalog: &TrackCatalog, track_type: TrackType, track_id: usize, input: &Path) -> AppError {
    let count = catalog.count(track_type);
    let range = if count == 0 {
        format!("file has no {} tracks", track_type)
    } else {
        format!("valid ids: 0..{}", count - 1)
    };
    AppError::TrackExtraction {
        track_type,
        track_id: Some(track_id),
        failure: ExtractionFailure::TrackNotFound,
        path: input.to_path_buf(),
        message: range,
    }
}

/// Extract a single track by id.
///
/// Analyzes the file if the catalog does not hold it yet, validates the id,
/// writes into `output_dir` and reports 0-100 through `progress`.
pub fn extract_track(
    extractor: &dyn TrackExtractor,
    catalog: &mut TrackCatalog,
    input: &Path,
    output_dir: &Path,
    track_id: usize,
    progress: &mut dyn FnMut(f32),
    options: &ExtractOptions,
) -> Result<PathBuf> {
    let track_type = extractor.track_type();
    let narrow = |e: AppError| e.into_extraction(track_type, Some(track_id), input);

    catalog.ensure_analyzed(input).map_err(narrow)?;

    let Some(track) = catalog.track(track_type, track_id).cloned() else {
        return Err(track_not_found(catalog, track_type, track_id, input));
    };

    ensure_directory(output_dir).map_err(narrow)?;
    let output = output_dir.join(output_file_name(
        input,
        &track,
        extractor.extension_for(&track.codec),
    ));

    progress(0.0);
    let job = ExtractionJob {
        adapter: catalog.adapter(),
        input,
        output: &output,
        track: &track,
        options,
        duration_secs: catalog.duration(),
    };
    let result = match extractor.extract_specialized(&job, progress) {
        Some(result) => result,
        None => job
            .adapter
            .extract_stream_with_progress(&job.copy_request(), progress),
    };
    result.map_err(narrow)?;
    progress(100.0);

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    info!(
        "Extracted {} -> {} ({})",
        track.display_name(),
        output.display(),
        format_size(size, DECIMAL)
    );
    Ok(output)
}

/// Extract every track of the extractor's type matching `languages`.
///
/// Video ignores the language list. Failed tracks are logged and recorded
/// in the returned failures; they never stop the remaining tracks.
pub fn extract_by_language<S: AsRef<str>>(
    extractor: &dyn TrackExtractor,
    catalog: &mut TrackCatalog,
    input: &Path,
    output_dir: &Path,
    languages: &[S],
    reporter: &ProgressReporter,
    options: &ExtractOptions,
) -> Result<TypeExtraction> {
    let track_type = extractor.track_type();
    catalog
        .ensure_analyzed(input)
        .map_err(|e| e.into_extraction(track_type, None, input))?;

    let candidates: Vec<Track> = if track_type == TrackType::Video {
        catalog.tracks_of(TrackType::Video).to_vec()
    } else {
        catalog.filter_by_language(languages, Some(track_type))
    };

    let mut outcome = TypeExtraction::default();
    if candidates.is_empty() {
        info!(
            "No {} tracks in {} match the requested languages",
            track_type,
            input.display()
        );
        return Ok(outcome);
    }

    for track in &candidates {
        let mut callback = reporter.track_callback(track);
        match extract_track(
            extractor,
            catalog,
            input,
            output_dir,
            track.id,
            &mut callback,
            options,
        ) {
            Ok(path) => outcome.paths.push(path),
            Err(e) => {
                error!("{}", e);
                outcome.failures.push(e.to_string());
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(track_type: TrackType, id: usize, language: Option<&str>) -> Track {
        Track {
            id,
            track_type,
            codec: "aac".to_string(),
            language: language.map(str::to_string),
            title: None,
            is_default: false,
            is_forced: false,
        }
    }

    #[test]
    fn output_names_include_type_id_and_language() {
        let input = Path::new("/media/My Movie.mkv");
        assert_eq!(
            output_file_name(input, &track(TrackType::Audio, 0, Some("eng")), "aac"),
            "My Movie.audio0.eng.aac"
        );
        assert_eq!(
            output_file_name(input, &track(TrackType::Video, 1, None), "mp4"),
            "My Movie.video1.mp4"
        );
        assert_eq!(
            output_file_name(input, &track(TrackType::Subtitle, 2, Some("und")), "srt"),
            "My Movie.subtitle2.srt"
        );
    }

    #[test]
    fn every_table_has_a_default() {
        let set = ExtractorSet::default();
        for track_type in TrackType::ALL {
            let extractor = set.get(track_type);
            assert_eq!(extractor.track_type(), track_type);
            assert!(
                extractor
                    .codec_extensions()
                    .iter()
                    .any(|(codec, _)| *codec == DEFAULT_CODEC)
            );
        }
    }

    #[test]
    fn unknown_codecs_use_default_extension() {
        let set = ExtractorSet::default();
        assert_eq!(set.audio.extension_for("AAC"), "aac");
        assert_eq!(set.audio.extension_for("mystery"), "mka");
        assert_eq!(set.subtitle.extension_for("mystery"), "mks");
        assert_eq!(set.video.extension_for("mystery"), "mkv");
        assert_eq!(set.video.error_kind(), "video extraction");
    }
}
