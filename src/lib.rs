//! Track identification and extraction for multi-track media containers.
//!
//! Files are probed through a [`adapter::MediaToolAdapter`], their streams
//! catalogued per type with normalized ISO 639-2 languages, and the
//! requested tracks extracted into standalone files.

pub mod adapter;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod language;
pub mod progress;
pub mod service;
pub mod tracks;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use adapter::{FfmpegAdapter, MediaToolAdapter};
pub use analyzer::{AnalysisSummary, TrackCatalog};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use progress::{ProgressEvent, ProgressReporter, ProgressSink, ThrottledSink};
pub use service::{
    BatchFailure, BatchOptions, BatchResult, ExtractionResult, ExtractionService,
    TrackExtractionResult,
};
pub use tracks::{ExtractionFilters, Track, TrackType};
