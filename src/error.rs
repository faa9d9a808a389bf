use crate::tracks::TrackType;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AppError>;

/// Why a single-track extraction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// Requested track id is outside the analyzed range
    TrackNotFound,
    /// The external tool failed or could not be started
    AdapterFailure,
    /// Output directory or path could not be prepared
    IoFailure,
    /// The source file could not be analyzed
    AnalysisFailure,
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtractionFailure::TrackNotFound => "track not found",
            ExtractionFailure::AdapterFailure => "tool failure",
            ExtractionFailure::IoFailure => "i/o failure",
            ExtractionFailure::AnalysisFailure => "analysis failure",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("[analyzer] media analysis failed for {}: {message}", path.display())]
    Analysis { path: PathBuf, message: String },

    #[error(
        "[{}] {failure} for {track_type} track {} of {}: {message}",
        track_type.error_kind(),
        track_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        path.display()
    )]
    TrackExtraction {
        track_type: TrackType,
        track_id: Option<usize>,
        failure: ExtractionFailure,
        path: PathBuf,
        message: String,
    },

    #[error("invalid track type '{0}': expected audio, subtitle or video")]
    InvalidTrackType(String),

    #[error("{tool} is not available: {message}")]
    DependencyUnavailable { tool: String, message: String },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("file access failed for {}: {message}", path.display())]
    FileAccess { path: PathBuf, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl AppError {
    pub fn analysis(path: &Path, message: impl Into<String>) -> Self {
        Self::Analysis {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn file_access(path: &Path, err: impl fmt::Display) -> Self {
        Self::FileAccess {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn dependency(tool: &str, message: impl Into<String>) -> Self {
        Self::DependencyUnavailable {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// Classify an error by the extraction stage it belongs to
    pub fn extraction_failure(&self) -> ExtractionFailure {
        match self {
            AppError::TrackExtraction { failure, .. } => *failure,
            AppError::Analysis { .. } | AppError::Json(_) => ExtractionFailure::AnalysisFailure,
            AppError::FileAccess { .. } => ExtractionFailure::IoFailure,
            _ => ExtractionFailure::AdapterFailure,
        }
    }

    /// Narrow any error into the extraction error of one track type.
    ///
    /// Errors that are already extraction errors keep their original
    /// classification and message.
    pub fn into_extraction(
        self,
        track_type: TrackType,
        track_id: Option<usize>,
        path: &Path,
    ) -> Self {
        if let AppError::TrackExtraction { .. } = self {
            return self;
        }
        let failure = self.extraction_failure();
        AppError::TrackExtraction {
            track_type,
            track_id,
            failure,
            path: path.to_path_buf(),
            message: self.to_string(),
        }
    }
}
