use super::{ExtractionJob, TrackExtractor};
use crate::adapter::{CodecMode, StreamRequest};
use crate::error::Result;
use crate::tracks::TrackType;
use tracing::debug;

/// Container extension per subtitle codec.
///
/// Bitmap formats without a raw muxer go to Matroska subtitles.
const SUBTITLE_EXTENSIONS: &[(&str, &str)] = &[
    ("subrip", "srt"),
    ("srt", "srt"),
    ("ass", "ass"),
    ("ssa", "ssa"),
    ("webvtt", "vtt"),
    ("mov_text", "srt"),
    ("dvd_subtitle", "mks"),
    ("hdmv_pgs_subtitle", "sup"),
    ("dvb_subtitle", "mks"),
    ("default", "mks"),
];

/// Codecs that cannot be stream copied into their mapped container
const SUBTITLE_ENCODERS: &[(&str, &str)] = &[("mov_text", "srt")];

/// Subtitle track extractor
#[derive(Debug, Default, Clone, Copy)]
pub struct SubtitleExtractor;

impl TrackExtractor for SubtitleExtractor {
    fn track_type(&self) -> TrackType {
        TrackType::Subtitle
    }

    fn codec_extensions(&self) -> &'static [(&'static str, &'static str)] {
        SUBTITLE_EXTENSIONS
    }

    fn extract_specialized(
        &self,
        job: &ExtractionJob<'_>,
        progress: &mut dyn FnMut(f32),
    ) -> Option<Result<()>> {
        let codec = subtitle_codec_mode(&job.track.codec);
        if codec == CodecMode::Copy {
            return None;
        }
        debug!("Converting {} subtitles with {}", job.track.codec, codec);
        let request = StreamRequest {
            codec,
            ..job.copy_request()
        };
        Some(job.adapter.extract_stream_with_progress(&request, progress))
    }
}

/// Codec mode for writing a subtitle stream of `codec`
pub fn subtitle_codec_mode(codec: &str) -> CodecMode {
    let codec = codec.to_lowercase();
    SUBTITLE_ENCODERS
        .iter()
        .find(|(name, _)| *name == codec)
        .map(|(_, encoder)| CodecMode::Encode(encoder.to_string()))
        .unwrap_or(CodecMode::Copy)
}
