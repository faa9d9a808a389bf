use super::command_builder::{
    build_cropdetect_args, build_extract_args, build_probe_args, latest_out_time,
    parse_crop_suggestions, stderr_tail,
};
use super::tools::resolve_tool;
use super::{MediaToolAdapter, ProbeOutput, StreamRequest};
use crate::config::ToolsConfig;
use crate::error::{AppError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Adapter that shells out to ffprobe and ffmpeg
#[derive(Debug, Clone, Default)]
pub struct FfmpegAdapter {
    ffmpeg_path: Option<PathBuf>,
    ffprobe_path: Option<PathBuf>,
}

impl FfmpegAdapter {
    pub fn new(tools: &ToolsConfig) -> Self {
        Self {
            ffmpeg_path: tools.ffmpeg_path.clone(),
            ffprobe_path: tools.ffprobe_path.clone(),
        }
    }

    fn ffmpeg(&self) -> Result<PathBuf> {
        resolve_tool("ffmpeg", self.ffmpeg_path.as_deref())
    }

    fn ffprobe(&self) -> Result<PathBuf> {
        resolve_tool("ffprobe", self.ffprobe_path.as_deref())
    }
}

impl MediaToolAdapter for FfmpegAdapter {
    fn probe(&self, path: &Path) -> Result<ProbeOutput> {
        let ffprobe = self.ffprobe()?;
        let output = Command::new(&ffprobe)
            .args(build_probe_args(path))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AppError::dependency("ffprobe", format!("failed to execute: {}", e)))?;

        if !output.status.success() {
            return Err(tool_failed(
                "ffprobe",
                output.status,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        ProbeOutput::from_json(&stdout)
            .map_err(|e| AppError::analysis(path, format!("Failed to parse ffprobe output: {}", e)))
    }

    fn extract_stream(&self, request: &StreamRequest) -> Result<()> {
        let ffmpeg = self.ffmpeg()?;
        let args = build_extract_args(request, None);
        debug!("ffmpeg {}", args.join(" "));

        let output = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AppError::dependency("ffmpeg", format!("failed to start: {}", e)))?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&request.output);
            return Err(tool_failed(
                "ffmpeg",
                output.status,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(())
    }

    fn extract_stream_with_progress(
        &self,
        request: &StreamRequest,
        progress: &mut dyn FnMut(f32),
    ) -> Result<()> {
        let ffmpeg = self.ffmpeg()?;
        let duration = request.duration_secs.unwrap_or(0.0);

        // One progress file per call so concurrent workers never share it
        let progress_file = tempfile::Builder::new()
            .prefix("trackextract_progress_")
            .tempfile()
            .map_err(|e| AppError::file_access(&std::env::temp_dir(), e))?;

        let args = build_extract_args(request, Some(progress_file.path()));
        info!(
            "Extracting {} stream {}: {} -> {} ({})",
            request.track_type,
            request.stream_index,
            request.input.display(),
            request.output.display(),
            request.codec
        );

        let mut child = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AppError::dependency("ffmpeg", format!("failed to start: {}", e)))?;

        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        progress(0.0);
        let status = run_progress_loop(&mut child, progress_file.path(), duration, progress);
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        let status = status.map_err(|e| AppError::ToolFailed {
            tool: "ffmpeg".to_string(),
            status: "unknown".to_string(),
            stderr: e.to_string(),
        })?;

        if !status.success() {
            let _ = std::fs::remove_file(&request.output);
            return Err(tool_failed("ffmpeg", status, &stderr));
        }

        progress(100.0);
        Ok(())
    }

    fn detect_crop(
        &self,
        path: &Path,
        stream_index: usize,
        sample_seconds: u32,
    ) -> Result<Vec<String>> {
        let ffmpeg = self.ffmpeg()?;
        let output = Command::new(&ffmpeg)
            .args(build_cropdetect_args(path, stream_index, sample_seconds))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AppError::dependency("ffmpeg", format!("failed to start: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let suggestions = parse_crop_suggestions(&stderr);

        if !output.status.success() {
            if suggestions.is_empty() {
                return Err(tool_failed("ffmpeg", output.status, &stderr));
            }
            warn!(
                "Crop detection exited with {} after {} suggestions",
                output.status,
                suggestions.len()
            );
        }

        debug!(
            "Crop detection on {} produced {} suggestions",
            path.display(),
            suggestions.len()
        );
        Ok(suggestions)
    }
}

/// Poll the child until it exits, forwarding progress read from the progress file
fn run_progress_loop(
    child: &mut Child,
    progress_file: &Path,
    duration: f64,
    progress: &mut dyn FnMut(f32),
) -> std::io::Result<ExitStatus> {
    let mut last_reported = 0.0_f32;
    loop {
        if duration > 0.0
            && let Ok(content) = std::fs::read_to_string(progress_file)
            && let Some(time_secs) = latest_out_time(&content)
        {
            let pct = (time_secs / duration * 100.0).min(100.0) as f32;
            if pct > last_reported {
                last_reported = pct;
                progress(pct);
            }
        }

        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn tool_failed(tool: &str, status: ExitStatus, stderr: &str) -> AppError {
    AppError::ToolFailed {
        tool: tool.to_string(),
        status: status.to_string(),
        stderr: stderr_tail(stderr, 5),
    }
}
