//! Single-file and batch extraction workflows.

pub mod batch;

pub use batch::{BatchFailure, BatchOptions, BatchResult};

use crate::adapter::{FfmpegAdapter, MediaToolAdapter};
use crate::analyzer::{AnalysisSummary, TrackCatalog};
use crate::config::AppConfig;
use crate::error::Result;
use crate::extractor::{self, ExtractOptions, ExtractorSet};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::tracks::{ExtractionFilters, TrackType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of extracting one file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    pub file: PathBuf,
    pub extracted_audio: usize,
    pub extracted_subtitles: usize,
    pub extracted_video: usize,
    pub output_paths: Vec<PathBuf>,
    /// True iff at least one track was extracted
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractionResult {
    fn new(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn failed(file: &Path, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(file)
        }
    }

    pub fn total_extracted(&self) -> usize {
        self.extracted_audio + self.extracted_subtitles + self.extracted_video
    }

    fn add(&mut self, track_type: TrackType, paths: Vec<PathBuf>) {
        let count = paths.len();
        match track_type {
            TrackType::Audio => self.extracted_audio += count,
            TrackType::Subtitle => self.extracted_subtitles += count,
            TrackType::Video => self.extracted_video += count,
        }
        self.output_paths.extend(paths);
    }
}

/// Outcome of extracting one specific track
#[derive(Debug, Clone, Serialize)]
pub struct TrackExtractionResult {
    pub file: PathBuf,
    pub track_type: String,
    pub track_id: usize,
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
}

/// Extraction orchestrator.
///
/// Owns its catalog and extractors; batch workers each build their own.
pub struct ExtractionService {
    adapter: Arc<dyn MediaToolAdapter>,
    catalog: TrackCatalog,
    extractors: ExtractorSet,
    crop_sample_seconds: u32,
}

impl ExtractionService {
    pub fn new(adapter: Arc<dyn MediaToolAdapter>) -> Self {
        Self {
            catalog: TrackCatalog::new(Arc::clone(&adapter)),
            adapter,
            extractors: ExtractorSet::default(),
            crop_sample_seconds: ExtractOptions::default().crop_sample_seconds,
        }
    }

    /// Service backed by ffmpeg/ffprobe as configured
    pub fn from_config(config: &AppConfig) -> Self {
        let adapter: Arc<dyn MediaToolAdapter> = Arc::new(FfmpegAdapter::new(&config.tools));
        Self::new(adapter).with_crop_sample_seconds(config.extraction.crop_sample_seconds)
    }

    pub fn with_crop_sample_seconds(mut self, seconds: u32) -> Self {
        self.crop_sample_seconds = seconds.max(1);
        self
    }

    pub fn adapter(&self) -> Arc<dyn MediaToolAdapter> {
        Arc::clone(&self.adapter)
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    /// Fresh service sharing this one's adapter and settings
    fn sibling(&self) -> Self {
        Self::new(self.adapter()).with_crop_sample_seconds(self.crop_sample_seconds)
    }

    fn extract_options(&self, remove_letterbox: bool) -> ExtractOptions {
        ExtractOptions {
            remove_letterbox,
            crop_sample_seconds: self.crop_sample_seconds,
        }
    }

    /// Analyze a file and summarize its tracks
    pub fn analyze(&mut self, file: &Path) -> Result<AnalysisSummary> {
        self.catalog.analyze(file)?;
        Ok(AnalysisSummary::from_catalog(file.to_path_buf(), &self.catalog))
    }

    /// Extract the tracks of one file selected by `filters`
    pub fn extract_tracks(
        &mut self,
        file: &Path,
        output_dir: &Path,
        filters: &ExtractionFilters,
        progress: Option<ProgressSink>,
    ) -> ExtractionResult {
        let reporter = ProgressReporter::new(progress);
        let result = self.extract_tracks_with(file, output_dir, filters, &reporter);
        reporter.complete();
        result
    }

    /// Same as [`Self::extract_tracks`], reporting through an existing reporter
    pub fn extract_tracks_with(
        &mut self,
        file: &Path,
        output_dir: &Path,
        filters: &ExtractionFilters,
        reporter: &ProgressReporter,
    ) -> ExtractionResult {
        info!(
            "Extracting {} from {} (languages: {})",
            filters.describe(),
            file.display(),
            filters.languages.join(", ")
        );
        let mut result = ExtractionResult::new(file);

        reporter.update_operation("analysis", 1, 1, 0.0);
        if let Err(e) = self.catalog.analyze(file) {
            error!("{}", e);
            result.error = Some(e.to_string());
            return result;
        }
        reporter.update_operation("analysis", 1, 1, 100.0);

        let plan = filters.plan();
        if plan.is_empty() {
            warn!("Both audio-only and subtitle-only are set, nothing to extract");
            result.error = Some(
                "No track types selected: audio-only and subtitle-only are both set".to_string(),
            );
            return result;
        }

        let options = self.extract_options(filters.remove_letterbox);
        let mut failures = Vec::new();
        for track_type in TrackType::ALL {
            if !plan.includes(track_type) {
                continue;
            }
            match extractor::extract_by_language(
                self.extractors.get(track_type),
                &mut self.catalog,
                file,
                output_dir,
                &filters.languages,
                reporter,
                &options,
            ) {
                Ok(outcome) => {
                    failures.extend(outcome.failures);
                    result.add(track_type, outcome.paths);
                }
                Err(e) => {
                    error!("{}", e);
                    failures.push(e.to_string());
                }
            }
        }

        result.success = result.total_extracted() > 0;
        if !result.success {
            result.error = Some(if !failures.is_empty() {
                failures.join("; ")
            } else if filters.languages.is_empty() {
                "No languages specified for extraction".to_string()
            } else {
                format!(
                    "No tracks matched requested languages: {}",
                    filters.languages.join(", ")
                )
            });
        }

        info!(
            "Finished {}: {} audio, {} subtitle, {} video tracks extracted",
            file.display(),
            result.extracted_audio,
            result.extracted_subtitles,
            result.extracted_video
        );
        result
    }

    /// Extract one track by type and id, ignoring languages
    pub fn extract_specific_track(
        &mut self,
        file: &Path,
        output_dir: &Path,
        track_type: &str,
        track_id: usize,
        remove_letterbox: bool,
        progress: Option<ProgressSink>,
    ) -> TrackExtractionResult {
        let reporter = ProgressReporter::new(progress);
        let mut result = TrackExtractionResult {
            file: file.to_path_buf(),
            track_type: track_type.to_string(),
            track_id,
            success: false,
            output_path: None,
            error: None,
        };

        let outcome = self.extract_one(
            file,
            output_dir,
            track_type,
            track_id,
            remove_letterbox,
            &reporter,
        );

        match outcome {
            Ok(path) => {
                result.success = true;
                result.output_path = Some(path);
            }
            Err(e) => {
                error!("{}", e);
                result.error = Some(e.to_string());
            }
        }

        reporter.complete();
        result
    }

    fn extract_one(
        &mut self,
        file: &Path,
        output_dir: &Path,
        track_type: &str,
        track_id: usize,
        remove_letterbox: bool,
        reporter: &ProgressReporter,
    ) -> Result<PathBuf> {
        self.catalog.analyze(file)?;
        let track_type: TrackType = track_type.parse()?;

        let language = self
            .catalog
            .track(track_type, track_id)
            .and_then(|t| t.language.clone());
        let mut callback =
            |pct: f32| reporter.update_track(track_type, track_id, pct, language.as_deref());
        let options = self.extract_options(remove_letterbox);

        extractor::extract_track(
            self.extractors.get(track_type),
            &mut self.catalog,
            file,
            output_dir,
            track_id,
            &mut callback,
            &options,
        )
    }
}
