//! In-memory media tool adapter for tests.

use crate::adapter::{MediaToolAdapter, ProbeOutput, StreamRequest};
use crate::error::{AppError, Result};
use crate::tracks::TrackType;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
struct Script {
    probes: HashMap<PathBuf, Value>,
    crops: HashMap<PathBuf, Vec<String>>,
    failing: HashSet<(PathBuf, TrackType, usize)>,
    panicking: HashSet<PathBuf>,
    requests: Vec<StreamRequest>,
    crop_calls: Vec<(PathBuf, usize, u32)>,
    probed: Vec<PathBuf>,
}

/// Adapter answering probes from registered JSON and writing placeholder
/// outputs for every extraction request
#[derive(Default)]
pub struct ScriptedAdapter {
    script: Mutex<Script>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register the probe output returned for `path`
    pub fn add_probe(&self, path: &Path, output: Value) {
        self.script().probes.insert(path.to_path_buf(), output);
    }

    /// Crop suggestions returned by `detect_crop` for `path`
    pub fn set_crops(&self, path: &Path, crops: &[&str]) {
        self.script()
            .crops
            .insert(path.to_path_buf(), crops.iter().map(|c| c.to_string()).collect());
    }

    /// Make extraction of one stream fail
    pub fn fail_extraction(&self, path: &Path, track_type: TrackType, index: usize) {
        self.script()
            .failing
            .insert((path.to_path_buf(), track_type, index));
    }

    /// Make every probe of `path` panic
    pub fn panic_on_probe(&self, path: &Path) {
        self.script().panicking.insert(path.to_path_buf());
    }

    /// Every extraction request received, in order
    pub fn requests(&self) -> Vec<StreamRequest> {
        self.script().requests.clone()
    }

    /// Every probed path, in order
    pub fn probed(&self) -> Vec<PathBuf> {
        self.script().probed.clone()
    }

    /// Every crop detection call as `(path, stream index, seconds)`
    pub fn crop_calls(&self) -> Vec<(PathBuf, usize, u32)> {
        self.script().crop_calls.clone()
    }
}

impl MediaToolAdapter for ScriptedAdapter {
    fn probe(&self, path: &Path) -> Result<ProbeOutput> {
        let value = {
            let mut script = self.script();
            script.probed.push(path.to_path_buf());
            if script.panicking.contains(path) {
                drop(script);
                panic!("scripted probe panic for {}", path.display());
            }
            script.probes.get(path).cloned()
        };
        let value = value.ok_or_else(|| AppError::ToolFailed {
            tool: "ffprobe".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "Invalid data found when processing input".to_string(),
        })?;
        Ok(serde_json::from_value(value)?)
    }

    fn extract_stream_with_progress(
        &self,
        request: &StreamRequest,
        progress: &mut dyn FnMut(f32),
    ) -> Result<()> {
        let fails = {
            let mut script = self.script();
            script.requests.push(request.clone());
            script.failing.contains(&(
                request.input.clone(),
                request.track_type,
                request.stream_index,
            ))
        };
        if fails {
            return Err(AppError::ToolFailed {
                tool: "ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!(
                    "Stream map '0:{}:{}' matches no streams",
                    request.track_type.specifier(),
                    request.stream_index
                ),
            });
        }

        progress(50.0);
        std::fs::write(&request.output, b"extracted")
            .map_err(|e| AppError::file_access(&request.output, e))?;
        progress(100.0);
        Ok(())
    }

    fn detect_crop(
        &self,
        path: &Path,
        stream_index: usize,
        sample_seconds: u32,
    ) -> Result<Vec<String>> {
        let mut script = self.script();
        script
            .crop_calls
            .push((path.to_path_buf(), stream_index, sample_seconds));
        Ok(script.crops.get(path).cloned().unwrap_or_default())
    }
}

/// Probe JSON for one stream with an optional language tag
pub fn stream(codec_type: &str, codec: &str, language: Option<&str>) -> Value {
    let tags = match language {
        Some(lang) => json!({ "language": lang }),
        None => json!({}),
    };
    json!({
        "codec_type": codec_type,
        "codec_name": codec,
        "tags": tags,
        "disposition": { "default": 0, "forced": 0 },
    })
}
