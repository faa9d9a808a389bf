//! Single-file extraction through `ExtractionService`

mod common;

use common::{add_movie, file_names, movie_probe, recording_sink, service};
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;
use trackextract::adapter::CodecMode;
use trackextract::testing::{ScriptedAdapter, stream};
use trackextract::{ExtractionFilters, ProgressEvent, TrackType};

#[test]
fn test_extracts_only_requested_audio_language() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    let out = dir.path().join("out");

    let filters = ExtractionFilters {
        audio_only: true,
        ..ExtractionFilters::new(["eng"])
    };
    let result = service(&adapter).extract_tracks(&file, &out, &filters, None);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.extracted_audio, 1);
    assert_eq!(result.extracted_subtitles, 0);
    assert_eq!(result.extracted_video, 0);
    assert_eq!(file_names(&result.output_paths), vec!["feature.audio0.eng.aac"]);
    assert!(out.join("feature.audio0.eng.aac").is_file());

    let requests = adapter.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].track_type, TrackType::Audio);
    assert_eq!(requests[0].stream_index, 0);
    assert_eq!(requests[0].codec, CodecMode::Copy);
}

#[test]
fn test_language_aliases_select_audio_and_subtitles() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    let out = dir.path().join("out");

    let result = service(&adapter).extract_tracks(
        &file,
        &out,
        &ExtractionFilters::new(["en", "Japanese"]),
        None,
    );

    assert!(result.success);
    assert_eq!(result.extracted_audio, 2);
    assert_eq!(result.extracted_subtitles, 1);
    assert_eq!(result.extracted_video, 0);
    assert_eq!(
        file_names(&result.output_paths),
        vec![
            "feature.audio0.eng.aac",
            "feature.audio1.jpn.aac",
            "feature.subtitle0.eng.srt"
        ]
    );
}

#[test]
fn test_audio_only_and_subtitle_only_extract_nothing() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());

    let filters = ExtractionFilters {
        audio_only: true,
        subtitle_only: true,
        ..ExtractionFilters::new(["eng"])
    };
    let result = service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(!result.success);
    assert_eq!(result.total_extracted(), 0);
    assert!(result.error.unwrap().contains("audio-only and subtitle-only"));
    assert!(adapter.requests().is_empty());
}

#[test]
fn test_video_only_ignores_languages() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());

    let filters = ExtractionFilters {
        video_only: true,
        audio_only: true,
        ..ExtractionFilters::new(["kor"])
    };
    let result = service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(result.success);
    assert_eq!(result.extracted_video, 1);
    assert_eq!(result.extracted_audio, 0);
    assert_eq!(file_names(&result.output_paths), vec!["feature.video0.mp4"]);
}

#[test]
fn test_include_video_adds_video_to_language_selection() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());

    let filters = ExtractionFilters {
        include_video: true,
        ..ExtractionFilters::new(["jpn"])
    };
    let result = service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(result.success);
    assert_eq!(result.extracted_audio, 1);
    assert_eq!(result.extracted_subtitles, 0);
    assert_eq!(result.extracted_video, 1);
}

#[test]
fn test_unmatched_languages_report_error() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());

    let result = service(&adapter).extract_tracks(
        &file,
        &dir.path().join("out"),
        &ExtractionFilters::new(["kor"]),
        None,
    );

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("No tracks matched requested languages: kor")
    );
}

#[test]
fn test_failed_track_does_not_stop_others() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    adapter.fail_extraction(&file, TrackType::Audio, 0);

    let filters = ExtractionFilters {
        audio_only: true,
        ..ExtractionFilters::new(["eng", "jpn"])
    };
    let result = service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(result.success);
    assert_eq!(result.extracted_audio, 1);
    assert_eq!(file_names(&result.output_paths), vec!["feature.audio1.jpn.aac"]);
    assert_eq!(adapter.requests().len(), 2);
}

#[test]
fn test_missing_file_is_analysis_failure() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());

    let result = service(&adapter).extract_tracks(
        &dir.path().join("nowhere.mkv"),
        &dir.path().join("out"),
        &ExtractionFilters::new(["eng"]),
        None,
    );

    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("[analyzer]"), "{}", error);
    assert!(error.contains("file not found"), "{}", error);
}

#[test]
fn test_letterbox_removal_crops_and_reencodes() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    adapter.set_crops(
        &file,
        &[
            "crop=1920:1072:0:4",
            "crop=1920:800:0:140",
            "crop=1920:800:0:140",
        ],
    );

    let filters = ExtractionFilters {
        video_only: true,
        remove_letterbox: true,
        ..ExtractionFilters::default()
    };
    let mut service = service(&adapter).with_crop_sample_seconds(30);
    let result = service.extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(result.success);
    assert_eq!(adapter.crop_calls(), vec![(file.clone(), 0, 30)]);
    let requests = adapter.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].video_filter.as_deref(), Some("crop=1920:800:0:140"));
    assert_eq!(requests[0].codec, CodecMode::Encode("libx264".to_string()));
}

#[test]
fn test_letterbox_without_suggestions_copies_stream() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());

    let filters = ExtractionFilters {
        video_only: true,
        remove_letterbox: true,
        ..ExtractionFilters::default()
    };
    let result = service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, None);

    assert!(result.success);
    let requests = adapter.requests();
    assert_eq!(requests[0].video_filter, None);
    assert_eq!(requests[0].codec, CodecMode::Copy);
}

#[test]
fn test_letterbox_progress_spans_detection_and_encode() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    adapter.set_crops(&file, &["crop=1920:800:0:140"]);
    let (sink, events) = recording_sink();

    let result = service(&adapter).extract_specific_track(
        &file,
        &dir.path().join("out"),
        "video",
        0,
        true,
        Some(sink),
    );
    assert!(result.success, "{:?}", result.error);

    let events = events.lock().unwrap();
    let track_pcts: Vec<f32> = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Track { track_type: TrackType::Video, .. }))
        .map(|e| e.percentage())
        .collect();
    assert_eq!(track_pcts, vec![0.0, 0.0, 20.0, 25.0, 62.5, 100.0, 100.0]);
    assert_eq!(events.last(), Some(&ProgressEvent::Complete));
}

#[test]
fn test_extract_specific_track() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    let out = dir.path().join("out");

    let result = service(&adapter).extract_specific_track(&file, &out, "audio", 1, false, None);

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.track_type, "audio");
    assert_eq!(result.track_id, 1);
    assert_eq!(
        result.output_path.as_deref(),
        Some(out.join("feature.audio1.jpn.aac").as_path())
    );
}

#[test]
fn test_specific_track_rejects_bad_type_and_id() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    let out = dir.path().join("out");
    let mut service = service(&adapter);

    let result = service.extract_specific_track(&file, &out, "commentary", 0, false, None);
    assert!(!result.success);
    assert!(result.error.unwrap().contains("invalid track type 'commentary'"));

    let result = service.extract_specific_track(&file, &out, "audio", 5, false, None);
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("[audio extraction]"), "{}", error);
    assert!(error.contains("valid ids: 0..1"), "{}", error);

    assert!(adapter.requests().is_empty());
}

#[test]
fn test_progress_reaches_sink_and_completes() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(&adapter, dir.path(), "feature.mkv", movie_probe());
    let (sink, events) = recording_sink();

    let filters = ExtractionFilters {
        subtitle_only: true,
        ..ExtractionFilters::new(["eng"])
    };
    let result =
        service(&adapter).extract_tracks(&file, &dir.path().join("out"), &filters, Some(sink));
    assert!(result.success);

    let events = events.lock().unwrap();
    assert_eq!(events.last(), Some(&ProgressEvent::Complete));
    assert!(events.iter().any(|e| matches!(
        e,
        ProgressEvent::Track {
            track_type: TrackType::Subtitle,
            track_id: 0,
            percentage,
            language: Some(lang),
        } if *percentage == 100.0 && lang == "eng"
    )));
    assert!(events.iter().all(|e| (0.0..=100.0).contains(&e.percentage())));
}

#[test]
fn test_analyze_summarizes_tracks() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let file = add_movie(
        &adapter,
        dir.path(),
        "show [jpn].mkv",
        json!({
            "streams": [
                stream("audio", "flac", None),
                stream("audio", "ac3", Some("ger")),
                stream("subtitle", "ass", Some("und")),
            ]
        }),
    );

    let summary = service(&adapter).analyze(&file).unwrap();

    assert_eq!(summary.audio_tracks, 2);
    assert_eq!(summary.subtitle_tracks, 1);
    assert_eq!(summary.video_tracks, 0);
    assert_eq!(summary.total_tracks(), 3);
    assert_eq!(
        summary.audio_languages.iter().cloned().collect::<Vec<_>>(),
        vec!["deu", "jpn"]
    );
    assert_eq!(summary.subtitle_languages.iter().cloned().collect::<Vec<_>>(), vec!["jpn"]);
    assert_eq!(summary.tracks[0].language_name, "Japanese");
}

#[test]
fn test_default_mode_skips_other_languages_and_video() {
    let dir = tempdir().unwrap();
    let adapter = Arc::new(ScriptedAdapter::new());
    let mut subtitle = stream("subtitle", "subrip", None);
    subtitle["tags"] = json!({ "LANGUAGE": "spa" });
    let file = add_movie(
        &adapter,
        dir.path(),
        "sample.mkv",
        json!({
            "streams": [
                stream("audio", "aac", Some("eng")),
                subtitle,
                stream("video", "h264", None),
            ]
        }),
    );

    let mut service = service(&adapter);
    let summary = service.analyze(&file).unwrap();
    let described: Vec<_> = summary
        .tracks
        .iter()
        .map(|t| (t.track_type, t.id, t.language.clone()))
        .collect();
    assert_eq!(
        described,
        vec![
            (TrackType::Audio, 0, Some("eng".to_string())),
            (TrackType::Subtitle, 0, Some("spa".to_string())),
            (TrackType::Video, 0, None),
        ]
    );

    let result =
        service.extract_tracks(&file, &dir.path().join("out"), &ExtractionFilters::new(["eng"]), None);
    assert!(result.success);
    assert_eq!(file_names(&result.output_paths), vec!["sample.audio0.eng.aac"]);
}
