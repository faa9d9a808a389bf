use super::TrackType;
use serde::{Deserialize, Serialize};

/// Which tracks an extraction should produce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFilters {
    /// Requested languages; tokens are normalized when matching
    pub languages: Vec<String>,
    pub audio_only: bool,
    pub subtitle_only: bool,
    pub video_only: bool,
    pub include_video: bool,
    pub remove_letterbox: bool,
}

/// Resolved per-type extraction plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackPlan {
    pub audio: bool,
    pub subtitle: bool,
    pub video: bool,
}

impl TrackPlan {
    pub fn includes(&self, track_type: TrackType) -> bool {
        match track_type {
            TrackType::Audio => self.audio,
            TrackType::Subtitle => self.subtitle,
            TrackType::Video => self.video,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.audio && !self.subtitle && !self.video
    }
}

impl ExtractionFilters {
    pub fn new<S: Into<String>>(languages: impl IntoIterator<Item = S>) -> Self {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Resolve the type flags.
    ///
    /// `video_only` overrides every other flag. Setting both `audio_only`
    /// and `subtitle_only` selects nothing.
    pub fn plan(&self) -> TrackPlan {
        if self.video_only {
            return TrackPlan {
                audio: false,
                subtitle: false,
                video: true,
            };
        }
        if self.audio_only && self.subtitle_only {
            return TrackPlan {
                audio: false,
                subtitle: false,
                video: false,
            };
        }
        TrackPlan {
            audio: !self.subtitle_only,
            subtitle: !self.audio_only,
            video: self.include_video,
        }
    }

    /// Human description of the extraction mode
    pub fn describe(&self) -> String {
        if self.video_only {
            return if self.remove_letterbox {
                "video only (letterbox removal)".to_string()
            } else {
                "video only".to_string()
            };
        }
        if self.audio_only && self.subtitle_only {
            return "nothing (audio-only and subtitle-only both set)".to_string();
        }

        let base = if self.audio_only {
            "audio only"
        } else if self.subtitle_only {
            "subtitles only"
        } else {
            "audio and subtitles"
        };
        match (self.include_video, self.remove_letterbox) {
            (true, true) => format!("{} (+ video, letterbox removal)", base),
            (true, false) => format!("{} (+ video)", base),
            _ => base.to_string(),
        }
    }
}
