use super::TrackExtractor;
use crate::tracks::TrackType;

const AUDIO_EXTENSIONS: &[(&str, &str)] = &[
    ("aac", "aac"),
    ("ac3", "ac3"),
    ("eac3", "eac3"),
    ("mp3", "mp3"),
    ("opus", "opus"),
    ("vorbis", "ogg"),
    ("flac", "flac"),
    ("dts", "dts"),
    ("truehd", "thd"),
    ("pcm_s16le", "wav"),
    ("pcm_s24le", "wav"),
    ("pcm_s32le", "wav"),
    ("default", "mka"),
];

/// Audio track extractor, plain stream copy
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioExtractor;

impl TrackExtractor for AudioExtractor {
    fn track_type(&self) -> TrackType {
        TrackType::Audio
    }

    fn codec_extensions(&self) -> &'static [(&'static str, &'static str)] {
        AUDIO_EXTENSIONS
    }
}
