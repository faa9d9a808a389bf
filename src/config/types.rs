use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// External tool locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Explicit ffmpeg binary; looked up on PATH when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit ffprobe binary; looked up on PATH when unset
    pub ffprobe_path: Option<PathBuf>,
}

/// Extraction defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Where extracted tracks go when no output directory is given
    pub output_directory: PathBuf,
    /// Languages used when none are requested
    pub default_languages: Vec<String>,
    /// Worker count for batch extraction
    pub concurrency: usize,
    /// Put each file's tracks in a subdirectory named after the file
    pub organize_by_filename: bool,
    /// Crop black bars from extracted video
    pub remove_letterbox: bool,
    /// Seconds of video sampled by crop detection
    pub crop_sample_seconds: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            output_directory: PathBuf::from("extracted"),
            default_languages: vec!["eng".to_string()],
            concurrency: cpus.min(4),
            organize_by_filename: true,
            remove_letterbox: false,
            crop_sample_seconds: 60,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Write a daily rolling log file instead of stderr
    pub log_to_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
        }
    }
}
