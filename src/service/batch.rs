use super::{ExtractionResult, ExtractionService};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::tracks::ExtractionFilters;
use crate::utils::files::{ensure_directory, find_media_files, unique_output_dirs};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{error, info, warn};
use uuid::Uuid;

/// How a batch is dispatched and laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Write each file's tracks into `<output>/<file stem>/`
    pub organize_by_filename: bool,
    /// Number of files processed at once; 0 and 1 mean sequential
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            organize_by_filename: true,
            concurrency: 1,
        }
    }
}

/// A file that produced no tracks or failed outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub file: PathBuf,
    pub error: String,
}

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub operation_id: String,
    pub total_files: usize,
    pub processed_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub extracted_tracks: usize,
    pub extracted_audio: usize,
    pub extracted_subtitles: usize,
    pub extracted_video: usize,
    /// Failures in input order
    pub failures: Vec<BatchFailure>,
    /// Set when the batch could not start at all
    pub error: Option<String>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl BatchResult {
    pub fn success(&self) -> bool {
        self.error.is_none() && self.failed_files == 0
    }
}

/// Counters shared by batch workers
#[derive(Debug, Default)]
struct BatchStats {
    total_files: usize,
    processed_files: usize,
    successful_files: usize,
    failed_files: usize,
    extracted_audio: usize,
    extracted_subtitles: usize,
    extracted_video: usize,
    failures: Vec<(usize, BatchFailure)>,
}

impl BatchStats {
    fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Self::default()
        }
    }

    fn record(&mut self, index: usize, file: &Path, outcome: Result<ExtractionResult, String>) {
        self.processed_files += 1;
        let error = match outcome {
            Ok(result) => {
                self.extracted_audio += result.extracted_audio;
                self.extracted_subtitles += result.extracted_subtitles;
                self.extracted_video += result.extracted_video;
                if result.success {
                    self.successful_files += 1;
                    return;
                }
                result
                    .error
                    .unwrap_or_else(|| "No tracks extracted".to_string())
            }
            Err(message) => message,
        };

        self.failed_files += 1;
        self.failures.push((
            index,
            BatchFailure {
                file: file.to_path_buf(),
                error,
            },
        ));
    }

    fn into_result(
        mut self,
        operation_id: String,
        started_at: DateTime<Local>,
        error: Option<String>,
    ) -> BatchResult {
        self.failures.sort_by_key(|(index, _)| *index);
        BatchResult {
            operation_id,
            total_files: self.total_files,
            processed_files: self.processed_files,
            successful_files: self.successful_files,
            failed_files: self.failed_files,
            extracted_tracks: self.extracted_audio + self.extracted_subtitles + self.extracted_video,
            extracted_audio: self.extracted_audio,
            extracted_subtitles: self.extracted_subtitles,
            extracted_video: self.extracted_video,
            failures: self.failures.into_iter().map(|(_, f)| f).collect(),
            error,
            started_at,
            finished_at: Local::now(),
        }
    }
}

/// Per-batch inputs shared by every file
struct BatchContext<'a> {
    files: &'a [PathBuf],
    /// Output directory per file
    output_dirs: &'a [PathBuf],
    filters: &'a ExtractionFilters,
    options: &'a BatchOptions,
    reporter: &'a Arc<ProgressReporter>,
}

impl BatchContext<'_> {
    /// Extract one file, converting a panic into a failure message
    fn run(&self, service: &mut ExtractionService, index: usize) -> Result<ExtractionResult, String> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.process(service, index)));
        outcome.map_err(|panic| {
            let message = format!("Extraction panicked: {}", panic_message(panic.as_ref()));
            error!("{}: {}", self.files[index].display(), message);
            // The catalog may be half rebuilt
            *service = service.sibling();
            message
        })
    }

    fn process(&self, service: &mut ExtractionService, index: usize) -> ExtractionResult {
        let file = &self.files[index];
        let total = self.files.len();
        info!("Processing file {}/{}: {}", index + 1, total, file.display());

        let file_output = &self.output_dirs[index];
        let result = match ensure_directory(file_output) {
            Ok(()) => {
                let reporter = self.reporter.file_reporter(index, total);
                service.extract_tracks_with(file, file_output, self.filters, &reporter)
            }
            Err(e) => {
                error!("{}", e);
                ExtractionResult::failed(file, e.to_string())
            }
        };

        self.reporter.update_operation("file", index + 1, total, 100.0);
        result
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl ExtractionService {
    /// Extract tracks from every media file under `paths`.
    ///
    /// Failures of single files are recorded in the result and never stop
    /// the batch. With `concurrency > 1` each worker owns its own service.
    pub fn batch_extract<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        output_dir: &Path,
        filters: &ExtractionFilters,
        options: &BatchOptions,
        progress: Option<ProgressSink>,
    ) -> BatchResult {
        let started_at = Local::now();
        let reporter =
            Arc::new(ProgressReporter::new(progress).with_operation_id(Uuid::new_v4().to_string()));
        let operation_id = reporter.operation_id().unwrap_or_default().to_string();

        let files = find_media_files(paths);
        if files.is_empty() {
            warn!("No media files found in the given paths");
            reporter.complete();
            return BatchStats::default().into_result(
                operation_id,
                started_at,
                Some("No media files found in the given paths".to_string()),
            );
        }

        info!(
            "Batch extracting {} files ({}) with concurrency {}",
            files.len(),
            filters.describe(),
            options.concurrency.max(1)
        );

        let output_dirs = unique_output_dirs(&files, output_dir, options.organize_by_filename);
        let context = BatchContext {
            files: &files,
            output_dirs: &output_dirs,
            filters,
            options,
            reporter: &reporter,
        };

        let stats = if options.concurrency <= 1 || files.len() == 1 {
            let mut stats = BatchStats::new(files.len());
            for (index, file) in files.iter().enumerate() {
                let outcome = context.run(self, index);
                stats.record(index, file, outcome);
            }
            stats
        } else {
            self.run_concurrent(&context)
        };

        reporter.complete();
        let result = stats.into_result(operation_id, started_at, None);
        info!(
            "Batch finished: {}/{} files succeeded, {} tracks extracted",
            result.successful_files, result.total_files, result.extracted_tracks
        );
        result
    }

    fn run_concurrent(&self, context: &BatchContext<'_>) -> BatchStats {
        let files = context.files;
        let workers = context.options.concurrency.min(files.len());
        let next = AtomicUsize::new(0);
        let stats = Mutex::new(BatchStats::new(files.len()));

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    let mut service = self.sibling();
                    loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        if index >= files.len() {
                            break;
                        }
                        let outcome = context.run(&mut service, index);
                        stats
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .record(index, &files[index], outcome);
                    }
                });
            }
        });

        stats.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(audio: usize, error: Option<&str>) -> ExtractionResult {
        ExtractionResult {
            file: PathBuf::from("x.mkv"),
            extracted_audio: audio,
            success: audio > 0,
            error: error.map(str::to_string),
            ..ExtractionResult::default()
        }
    }

    #[test]
    fn stats_count_and_order_failures() {
        let mut stats = BatchStats::new(3);
        stats.record(2, Path::new("c.mkv"), Err("boom".to_string()));
        stats.record(0, Path::new("a.mkv"), Ok(result(0, Some("No tracks matched"))));
        stats.record(1, Path::new("b.mkv"), Ok(result(2, None)));

        let batch = stats.into_result("op".to_string(), Local::now(), None);
        assert_eq!(batch.processed_files, 3);
        assert_eq!(batch.successful_files, 1);
        assert_eq!(batch.failed_files, 2);
        assert_eq!(batch.extracted_tracks, 2);
        assert_eq!(
            batch.failures.iter().map(|f| f.file.clone()).collect::<Vec<_>>(),
            vec![PathBuf::from("a.mkv"), PathBuf::from("c.mkv")]
        );
        assert!(!batch.success());
    }

    #[test]
    fn panic_messages_are_extracted() {
        let boxed: Box<dyn Any + Send> = Box::new("bad stream");
        assert_eq!(panic_message(boxed.as_ref()), "bad stream");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(boxed.as_ref()), "owned");
    }
}
