use crate::adapter::{MediaToolAdapter, ProbeOutput};
use crate::error::{AppError, Result};
use crate::language;
use crate::tracks::{Track, TrackType};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const LANGUAGE_KEYS: [&str; 4] = ["language", "LANGUAGE", "lang", "Language"];
const TITLE_KEYS: [&str; 3] = ["title", "TITLE", "Title"];

/// Track collection of the most recently analyzed file.
///
/// `tracks()` is always the audio, subtitle and video views in discovery
/// order. Each re-analysis replaces the whole set.
pub struct TrackCatalog {
    adapter: Arc<dyn MediaToolAdapter>,
    tracks: Vec<Track>,
    audio: Vec<Track>,
    subtitle: Vec<Track>,
    video: Vec<Track>,
    last_file: Option<PathBuf>,
    duration: Option<f64>,
}

impl TrackCatalog {
    pub fn new(adapter: Arc<dyn MediaToolAdapter>) -> Self {
        Self {
            adapter,
            tracks: Vec::new(),
            audio: Vec::new(),
            subtitle: Vec::new(),
            video: Vec::new(),
            last_file: None,
            duration: None,
        }
    }

    pub fn adapter(&self) -> &dyn MediaToolAdapter {
        self.adapter.as_ref()
    }

    /// Probe a file and rebuild the catalog from its streams
    pub fn analyze(&mut self, path: &Path) -> Result<&[Track]> {
        self.clear();

        if !path.is_file() {
            return Err(AppError::analysis(path, "file not found"));
        }

        let probe = self
            .adapter
            .probe(path)
            .map_err(|e| match e {
                AppError::Analysis { .. } => e,
                other => AppError::analysis(path, other.to_string()),
            })?;

        self.last_file = Some(path.to_path_buf());
        self.duration = probe.duration_secs();
        self.populate(path, &probe);

        info!(
            "Analyzed {}: {} audio, {} subtitle, {} video tracks",
            path.display(),
            self.audio.len(),
            self.subtitle.len(),
            self.video.len()
        );
        Ok(&self.tracks)
    }

    /// Analyze `path` unless it is already the catalogued file
    pub fn ensure_analyzed(&mut self, path: &Path) -> Result<()> {
        if self.last_file.as_deref() != Some(path) {
            self.analyze(path)?;
        }
        Ok(())
    }

    fn populate(&mut self, path: &Path, probe: &ProbeOutput) {
        let Some(streams) = probe.streams.as_ref() else {
            warn!("No stream list in probe output for {}", path.display());
            return;
        };

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let container_language = probe.format_tag(&LANGUAGE_KEYS);

        for stream in streams {
            let Some(track_type) = stream.codec_type.as_deref().and_then(TrackType::from_codec_type)
            else {
                debug!(
                    "Skipping stream {:?} of kind {:?}",
                    stream.index, stream.codec_type
                );
                continue;
            };

            let title = stream.tag(&TITLE_KEYS).map(str::to_string);
            let metadata_language = stream.tag(&LANGUAGE_KEYS).or(container_language);
            let language =
                language::enhance_detection(metadata_language, &filename, title.as_deref())
                    .map(str::to_string);

            let view = self.view_mut(track_type);
            view.push(Track {
                id: view.len(),
                track_type,
                codec: stream
                    .codec_name
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                language,
                title,
                is_default: stream.is_default(),
                is_forced: stream.is_forced(),
            });
        }

        self.tracks = self
            .audio
            .iter()
            .chain(&self.subtitle)
            .chain(&self.video)
            .cloned()
            .collect();
    }

    fn clear(&mut self) {
        self.tracks.clear();
        self.audio.clear();
        self.subtitle.clear();
        self.video.clear();
        self.last_file = None;
        self.duration = None;
    }

    fn view_mut(&mut self, track_type: TrackType) -> &mut Vec<Track> {
        match track_type {
            TrackType::Audio => &mut self.audio,
            TrackType::Subtitle => &mut self.subtitle,
            TrackType::Video => &mut self.video,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn tracks_of(&self, track_type: TrackType) -> &[Track] {
        match track_type {
            TrackType::Audio => &self.audio,
            TrackType::Subtitle => &self.subtitle,
            TrackType::Video => &self.video,
        }
    }

    pub fn count(&self, track_type: TrackType) -> usize {
        self.tracks_of(track_type).len()
    }

    pub fn track(&self, track_type: TrackType, id: usize) -> Option<&Track> {
        self.tracks_of(track_type).get(id)
    }

    pub fn last_file(&self) -> Option<&Path> {
        self.last_file.as_deref()
    }

    /// Container duration of the catalogued file in seconds
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn view(&self, track_type: Option<TrackType>) -> &[Track] {
        match track_type {
            Some(t) => self.tracks_of(t),
            None => &self.tracks,
        }
    }

    /// Tracks matching any of the requested languages.
    ///
    /// Video tracks always pass. An `und`, `unknown` or empty code in the
    /// request also accepts tracks without a resolved language.
    pub fn filter_by_language<S: AsRef<str>>(
        &self,
        codes: &[S],
        track_type: Option<TrackType>,
    ) -> Vec<Track> {
        let include_undefined = codes
            .iter()
            .any(|c| language::is_undefined_token(c.as_ref()));
        let accepted: BTreeSet<String> = language::normalize_all(codes)
            .into_iter()
            .filter(|c| c != language::UNDEFINED)
            .collect();

        self.view(track_type)
            .iter()
            .filter(|track| {
                if track.track_type == TrackType::Video {
                    return true;
                }
                match track.language.as_deref() {
                    Some(lang) if !track.is_undefined_language() => {
                        let code = language::normalize(lang)
                            .map(str::to_string)
                            .unwrap_or_else(|| lang.to_lowercase());
                        accepted.contains(&code)
                    }
                    _ => include_undefined,
                }
            })
            .cloned()
            .collect()
    }

    /// Distinct resolved languages in a view, excluding `und`
    pub fn available_languages(&self, track_type: Option<TrackType>) -> BTreeSet<String> {
        self.view(track_type)
            .iter()
            .filter(|t| !t.is_undefined_language())
            .filter_map(|t| t.language.as_deref())
            .map(|lang| {
                language::normalize(lang)
                    .map(str::to_string)
                    .unwrap_or_else(|| lang.to_string())
            })
            .collect()
    }
}
