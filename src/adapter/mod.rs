//! Boundary to the external probing and transcoding tools.

pub mod command_builder;
pub mod ffmpeg;
pub mod probe;
pub mod tools;

pub use ffmpeg::FfmpegAdapter;
pub use probe::{Disposition, ProbeFormat, ProbeOutput, ProbeStream};
pub use tools::{DependencyStatus, ToolInfo};

use crate::error::Result;
use crate::tracks::TrackType;
use std::fmt;
use std::path::{Path, PathBuf};

/// How the extracted stream is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecMode {
    /// Stream copy, no re-encode
    Copy,
    /// Re-encode with the named encoder (`libx264`, `libx265`, ...)
    Encode(String),
}

impl CodecMode {
    pub fn as_arg(&self) -> &str {
        match self {
            CodecMode::Copy => "copy",
            CodecMode::Encode(encoder) => encoder,
        }
    }
}

impl fmt::Display for CodecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// One stream extraction job handed to the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub track_type: TrackType,
    /// Index among streams of the same type
    pub stream_index: usize,
    pub codec: CodecMode,
    /// Optional video filter such as `crop=1920:800:0:140`
    pub video_filter: Option<String>,
    /// Input duration in seconds, known from the probe
    pub duration_secs: Option<f64>,
}

impl StreamRequest {
    pub fn copy(input: &Path, output: &Path, track_type: TrackType, stream_index: usize) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            track_type,
            stream_index,
            codec: CodecMode::Copy,
            video_filter: None,
            duration_secs: None,
        }
    }
}

/// Media tool operations the extraction core depends on.
///
/// Implementations must be callable from several worker threads at once.
pub trait MediaToolAdapter: Send + Sync {
    /// Probe a container for its streams, tags and dispositions
    fn probe(&self, path: &Path) -> Result<ProbeOutput>;

    /// Extract one stream, reporting 0-100 progress
    fn extract_stream_with_progress(
        &self,
        request: &StreamRequest,
        progress: &mut dyn FnMut(f32),
    ) -> Result<()>;

    /// Extract one stream without progress reporting
    fn extract_stream(&self, request: &StreamRequest) -> Result<()> {
        self.extract_stream_with_progress(request, &mut |_| {})
    }

    /// Run crop detection over the first `sample_seconds` of a video stream,
    /// returning every `crop=W:H:X:Y` suggestion in the order seen
    fn detect_crop(&self, path: &Path, stream_index: usize, sample_seconds: u32)
    -> Result<Vec<String>>;
}
