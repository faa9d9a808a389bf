use super::StreamRequest;
use crate::tracks::TrackType;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CROP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"crop=([0-9]+:[0-9]+:[0-9]+:[0-9]+)").unwrap());

/// Build ffprobe arguments for a full stream and format listing
pub fn build_probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_streams".to_string(),
        "-show_format".to_string(),
        "-of".to_string(),
        "json".to_string(),
        input.to_string_lossy().to_string(),
    ]
}

/// Build FFmpeg arguments for a single stream extraction
pub fn build_extract_args(request: &StreamRequest, progress_file: Option<&Path>) -> Vec<String> {
    let spec = request.track_type.specifier();
    let mut args = vec![
        "-nostdin".to_string(),
        "-hide_banner".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-y".to_string(),
    ];

    if let Some(path) = progress_file {
        args.push("-progress".to_string());
        args.push(path.to_string_lossy().to_string());
    }

    args.extend([
        "-i".to_string(),
        request.input.to_string_lossy().to_string(),
        "-map".to_string(),
        format!("0:{}:{}", spec, request.stream_index),
    ]);

    if request.track_type == TrackType::Video
        && let Some(ref filter) = request.video_filter
    {
        args.push("-vf".to_string());
        args.push(filter.clone());
    }

    args.push(format!("-c:{}", spec));
    args.push(request.codec.as_arg().to_string());
    args.push(request.output.to_string_lossy().to_string());

    args
}

/// Build FFmpeg arguments for crop detection on one video stream
pub fn build_cropdetect_args(input: &Path, stream_index: usize, sample_seconds: u32) -> Vec<String> {
    vec![
        "-nostdin".to_string(),
        "-hide_banner".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-map".to_string(),
        format!("0:v:{}", stream_index),
        "-vf".to_string(),
        "cropdetect=24:16:0".to_string(),
        "-t".to_string(),
        sample_seconds.to_string(),
        "-f".to_string(),
        "null".to_string(),
        "-".to_string(),
    ]
}

/// Collect every `crop=W:H:X:Y` suggestion from cropdetect output
pub fn parse_crop_suggestions(output: &str) -> Vec<String> {
    CROP_RE
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| format!("crop={}", m.as_str()))
        .collect()
}

/// Latest `out_time_us` value from an FFmpeg `-progress` file, in seconds
pub fn latest_out_time(progress: &str) -> Option<f64> {
    let mut latest_time_us: Option<f64> = None;
    for line in progress.lines() {
        if let Some(value) = line.strip_prefix("out_time_us=")
            && let Ok(time_us) = value.trim().parse::<f64>()
            && time_us > 0.0
        {
            latest_time_us = Some(time_us);
        }
    }
    latest_time_us.map(|us| us / 1_000_000.0)
}

/// Keep the tail of tool diagnostics for error messages
pub fn stderr_tail(stderr: &str, lines: usize) -> String {
    let tail: Vec<&str> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .rev()
        .take(lines)
        .collect();
    tail.into_iter().rev().collect::<Vec<_>>().join("\n")
}
