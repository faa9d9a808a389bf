pub mod selection;

pub use selection::{ExtractionFilters, TrackPlan};

use crate::error::AppError;
use crate::language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Subtitle,
    Video,
}

impl TrackType {
    /// Processing order within one file
    pub const ALL: [TrackType; 3] = [TrackType::Audio, TrackType::Subtitle, TrackType::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Audio => "audio",
            TrackType::Subtitle => "subtitle",
            TrackType::Video => "video",
        }
    }

    /// Stream specifier letter used by ffmpeg (`0:a:1`, `-c:s`)
    pub fn specifier(&self) -> &'static str {
        match self {
            TrackType::Audio => "a",
            TrackType::Subtitle => "s",
            TrackType::Video => "v",
        }
    }

    /// Classification tag of failures raised while extracting this type
    pub fn error_kind(&self) -> &'static str {
        match self {
            TrackType::Audio => "audio extraction",
            TrackType::Subtitle => "subtitle extraction",
            TrackType::Video => "video extraction",
        }
    }

    /// Map an ffprobe `codec_type`; attachments and data streams yield `None`
    pub fn from_codec_type(codec_type: &str) -> Option<Self> {
        match codec_type {
            "audio" => Some(TrackType::Audio),
            "subtitle" => Some(TrackType::Subtitle),
            "video" => Some(TrackType::Video),
            _ => None,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "audio" | "a" => Ok(TrackType::Audio),
            "subtitle" | "subtitles" | "sub" | "s" => Ok(TrackType::Subtitle),
            "video" | "v" => Ok(TrackType::Video),
            _ => Err(AppError::InvalidTrackType(s.to_string())),
        }
    }
}

/// One elementary stream inside a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Sequential id within its type, starting at 0
    pub id: usize,
    pub track_type: TrackType,
    pub codec: String,
    /// Canonical language code, if one could be resolved
    pub language: Option<String>,
    pub title: Option<String>,
    pub is_default: bool,
    pub is_forced: bool,
}

impl Track {
    pub fn display_name(&self) -> String {
        let lang = self
            .language
            .as_deref()
            .map(language::display_name)
            .unwrap_or_else(|| "Unknown".to_string());
        let title = self
            .title
            .as_ref()
            .map(|t| format!(" - {}", t))
            .unwrap_or_default();
        let default = if self.is_default { " [default]" } else { "" };
        let forced = if self.is_forced { " [forced]" } else { "" };
        format!(
            "{}: {} ({}){}{}{}",
            self.id,
            lang,
            self.codec.to_uppercase(),
            title,
            default,
            forced
        )
    }

    /// Stable key for progress bookkeeping
    pub fn task_key(&self) -> String {
        format!("{}_{}", self.track_type, self.id)
    }

    /// Whether the track has no usable language
    pub fn is_undefined_language(&self) -> bool {
        self.language
            .as_deref()
            .is_none_or(|l| l.is_empty() || l == language::UNDEFINED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(track_type: TrackType, language: Option<&str>) -> Track {
        Track {
            id: 1,
            track_type,
            codec: "aac".to_string(),
            language: language.map(str::to_string),
            title: Some("Commentary".to_string()),
            is_default: true,
            is_forced: false,
        }
    }

    #[test]
    fn display_name_is_derived() {
        let t = track(TrackType::Audio, Some("eng"));
        assert_eq!(t.display_name(), "1: English (AAC) - Commentary [default]");

        let t = track(TrackType::Audio, None);
        assert!(t.display_name().starts_with("1: Unknown (AAC)"));
    }

    #[test]
    fn track_type_parses_loosely() {
        assert_eq!("Audio".parse::<TrackType>().unwrap(), TrackType::Audio);
        assert_eq!("subtitles".parse::<TrackType>().unwrap(), TrackType::Subtitle);
        assert_eq!("v".parse::<TrackType>().unwrap(), TrackType::Video);
        assert!("data".parse::<TrackType>().is_err());
    }

    #[test]
    fn codec_type_mapping_skips_other_kinds() {
        assert_eq!(TrackType::from_codec_type("audio"), Some(TrackType::Audio));
        assert_eq!(TrackType::from_codec_type("attachment"), None);
        assert_eq!(TrackType::from_codec_type("data"), None);
    }

    #[test]
    fn undefined_language_detection() {
        assert!(track(TrackType::Audio, None).is_undefined_language());
        assert!(track(TrackType::Audio, Some("und")).is_undefined_language());
        assert!(!track(TrackType::Audio, Some("jpn")).is_undefined_language());
        assert_eq!(track(TrackType::Subtitle, None).task_key(), "subtitle_1");
    }
}
