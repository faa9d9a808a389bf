use super::TrackCatalog;
use crate::language;
use crate::tracks::{Track, TrackType};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Per-track descriptor returned by `analyze`
#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub id: usize,
    pub track_type: TrackType,
    pub codec: String,
    pub language: Option<String>,
    pub language_name: String,
    pub title: Option<String>,
    pub is_default: bool,
    pub is_forced: bool,
    pub display: String,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            track_type: track.track_type,
            codec: track.codec.clone(),
            language: track.language.clone(),
            language_name: track
                .language
                .as_deref()
                .map(language::display_name)
                .unwrap_or_else(|| "Unknown".to_string()),
            title: track.title.clone(),
            is_default: track.is_default,
            is_forced: track.is_forced,
            display: track.display_name(),
        }
    }
}

/// Track summary of one analyzed file
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub file: PathBuf,
    pub audio_tracks: usize,
    pub subtitle_tracks: usize,
    pub video_tracks: usize,
    pub audio_languages: BTreeSet<String>,
    pub subtitle_languages: BTreeSet<String>,
    pub tracks: Vec<TrackSummary>,
}

impl AnalysisSummary {
    pub fn from_catalog(file: PathBuf, catalog: &TrackCatalog) -> Self {
        Self {
            file,
            audio_tracks: catalog.count(TrackType::Audio),
            subtitle_tracks: catalog.count(TrackType::Subtitle),
            video_tracks: catalog.count(TrackType::Video),
            audio_languages: catalog.available_languages(Some(TrackType::Audio)),
            subtitle_languages: catalog.available_languages(Some(TrackType::Subtitle)),
            tracks: catalog.tracks().iter().map(TrackSummary::from).collect(),
        }
    }

    pub fn total_tracks(&self) -> usize {
        self.audio_tracks + self.subtitle_tracks + self.video_tracks
    }
}
