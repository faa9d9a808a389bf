use super::{ExtractionJob, TrackExtractor};
use crate::adapter::{CodecMode, StreamRequest};
use crate::error::Result;
use crate::tracks::TrackType;
use tracing::{info, warn};

const VIDEO_EXTENSIONS: &[(&str, &str)] = &[
    ("h264", "mp4"),
    ("hevc", "mp4"),
    ("mpeg4", "mp4"),
    ("av1", "mp4"),
    ("mpeg2video", "mpg"),
    ("vp8", "webm"),
    ("vp9", "webm"),
    ("theora", "ogv"),
    ("default", "mkv"),
];

/// Encoders used when a crop filter forces a re-encode
const CROP_ENCODERS: &[(&str, &str)] = &[
    ("h264", "libx264"),
    ("mpeg4", "libx264"),
    ("hevc", "libx265"),
    ("vp8", "libvpx"),
    ("vp9", "libvpx-vp9"),
    ("av1", "libsvtav1"),
    ("mpeg2video", "mpeg2video"),
];

/// Progress reached once crop detection finished
const DETECTION_DONE: f32 = 20.0;
/// Progress reached once a crop was selected
const SELECTION_DONE: f32 = 25.0;

/// Video track extractor with optional letterbox removal
#[derive(Debug, Default, Clone, Copy)]
pub struct VideoExtractor;

impl TrackExtractor for VideoExtractor {
    fn track_type(&self) -> TrackType {
        TrackType::Video
    }

    fn codec_extensions(&self) -> &'static [(&'static str, &'static str)] {
        VIDEO_EXTENSIONS
    }

    fn extract_specialized(
        &self,
        job: &ExtractionJob<'_>,
        progress: &mut dyn FnMut(f32),
    ) -> Option<Result<()>> {
        if !job.options.remove_letterbox {
            return None;
        }
        Some(remove_letterbox(job, progress))
    }
}

/// Codec mode for writing a cropped stream of `codec`
pub fn crop_codec_mode(codec: &str) -> CodecMode {
    let codec = codec.to_lowercase();
    CROP_ENCODERS
        .iter()
        .find(|(name, _)| *name == codec)
        .map(|(_, encoder)| CodecMode::Encode(encoder.to_string()))
        .unwrap_or(CodecMode::Copy)
}

/// Most frequent crop suggestion; ties go to the one seen first
pub fn select_crop(suggestions: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for suggestion in suggestions {
        match counts.iter_mut().find(|(s, _)| *s == suggestion.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((suggestion.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (suggestion, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((suggestion, count));
        }
    }
    best.map(|(s, _)| s.to_string())
}

/// Detect black bars, pick the dominant crop and extract the cropped stream.
///
/// Progress: 0-20 detection, 20-25 selection, 25-100 extraction. Without
/// any suggestion the stream is copied uncropped.
fn remove_letterbox(job: &ExtractionJob<'_>, progress: &mut dyn FnMut(f32)) -> Result<()> {
    let track = job.track;
    progress(0.0);

    let suggestions = match job.adapter.detect_crop(
        job.input,
        track.id,
        job.options.crop_sample_seconds,
    ) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!("Crop detection failed for video {}: {}", track.id, e);
            Vec::new()
        }
    };
    progress(DETECTION_DONE);

    let mut scaled = |p: f32| progress(SELECTION_DONE + p.clamp(0.0, 100.0) * 0.75);

    let Some(crop) = select_crop(&suggestions) else {
        info!(
            "No crop detected for video {} of {}, copying uncropped",
            track.id,
            job.input.display()
        );
        return job
            .adapter
            .extract_stream_with_progress(&job.copy_request(), &mut scaled);
    };

    let codec = crop_codec_mode(&track.codec);
    if codec == CodecMode::Copy {
        warn!(
            "No encoder known for {} video, copying video {} uncropped",
            track.codec, track.id
        );
        return job
            .adapter
            .extract_stream_with_progress(&job.copy_request(), &mut scaled);
    }

    info!(
        "Removing letterbox from video {} with {} ({} of {} samples)",
        track.id,
        crop,
        suggestions.iter().filter(|s| **s == crop).count(),
        suggestions.len()
    );
    scaled(0.0);

    let request = StreamRequest {
        video_filter: Some(crop),
        codec,
        ..job.copy_request()
    };
    job.adapter.extract_stream_with_progress(&request, &mut scaled)
}
