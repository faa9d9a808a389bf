//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use trackextract::testing::{ScriptedAdapter, stream};
use trackextract::{ExtractionService, ProgressEvent, ProgressSink};

/// Create an empty placeholder media file
pub fn media_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"").unwrap();
    path
}

/// Probe output for a typical movie: h264 video, English and Japanese
/// audio, English subtitles
pub fn movie_probe() -> Value {
    json!({
        "streams": [
            stream("video", "h264", None),
            stream("audio", "aac", Some("eng")),
            stream("audio", "aac", Some("jpn")),
            stream("subtitle", "subrip", Some("eng")),
        ],
        "format": { "format_name": "matroska,webm", "duration": "5400.0" }
    })
}

/// Register `probe` for a new placeholder file
pub fn add_movie(adapter: &ScriptedAdapter, dir: &Path, name: &str, probe: Value) -> PathBuf {
    let path = media_file(dir, name);
    adapter.add_probe(&path, probe);
    path
}

pub fn service(adapter: &Arc<ScriptedAdapter>) -> ExtractionService {
    ExtractionService::new(adapter.clone())
}

/// Sink recording every event it receives
pub fn recording_sink() -> (ProgressSink, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&events);
    let sink: ProgressSink = Arc::new(move |event: &ProgressEvent| {
        recorded.lock().unwrap().push(event.clone());
    });
    (sink, events)
}

pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}
