//! Progress aggregation from track callbacks up to file and batch level.

pub mod throttle;

pub use throttle::ThrottledSink;

use crate::tracks::{Track, TrackType};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Caller supplied receiver of progress events
pub type ProgressSink = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// A single progress update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Progress of one track extraction
    Track {
        track_type: TrackType,
        track_id: usize,
        percentage: f32,
        language: Option<String>,
    },
    /// Progress of one item of a multi-item operation
    Operation {
        current: usize,
        total: usize,
        percentage: f32,
        operation: String,
    },
    /// Everything finished
    Complete,
}

impl ProgressEvent {
    pub fn percentage(&self) -> f32 {
        match self {
            ProgressEvent::Track { percentage, .. } | ProgressEvent::Operation { percentage, .. } => {
                *percentage
            }
            ProgressEvent::Complete => 100.0,
        }
    }

    /// Positional payload: `[type, id, pct, lang]`, `[current, total, pct, op]`
    /// or `[null, 0, 100, null]` for completion
    pub fn to_args(&self) -> Value {
        match self {
            ProgressEvent::Track {
                track_type,
                track_id,
                percentage,
                language,
            } => json!([track_type, track_id, percentage, language]),
            ProgressEvent::Operation {
                current,
                total,
                percentage,
                operation,
            } => json!([current, total, percentage, operation]),
            ProgressEvent::Complete => json!([Value::Null, 0, 100.0, Value::Null]),
        }
    }
}

/// Clamp a reported percentage into 0..=100
fn clamp_percentage(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Fan-in progress aggregator.
///
/// Every update is recorded in a task table keyed by `"{type}_{id}"` or
/// `"{operation}_{index}"` and forwarded to the sink. Sink panics are
/// caught and logged.
pub struct ProgressReporter {
    sink: Option<ProgressSink>,
    operation_id: Option<String>,
    tasks: Mutex<HashMap<String, f32>>,
    parent: Option<ParentLink>,
}

/// Batch item a child reporter aggregates into
struct ParentLink {
    reporter: Arc<ProgressReporter>,
    index: usize,
    total: usize,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ProgressReporter {
    pub fn new(sink: Option<ProgressSink>) -> Self {
        Self {
            sink,
            operation_id: None,
            tasks: Mutex::new(HashMap::new()),
            parent: None,
        }
    }

    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Record and forward a track update
    pub fn update_track(
        &self,
        track_type: TrackType,
        track_id: usize,
        percentage: f32,
        language: Option<&str>,
    ) {
        let percentage = clamp_percentage(percentage);
        self.record(format!("{}_{}", track_type, track_id), percentage);
        self.forward(ProgressEvent::Track {
            track_type,
            track_id,
            percentage,
            language: language.map(str::to_string),
        });
        self.propagate(track_type.as_str());
    }

    /// Record and forward an operation update
    pub fn update_operation(&self, operation: &str, current: usize, total: usize, percentage: f32) {
        let percentage = clamp_percentage(percentage);
        self.record(format!("{}_{}", operation, current), percentage);
        self.forward(ProgressEvent::Operation {
            current,
            total,
            percentage,
            operation: operation.to_string(),
        });
        self.propagate(operation);
    }

    /// Callback bound to one track
    pub fn track_callback<'a>(&'a self, track: &'a Track) -> impl FnMut(f32) + 'a {
        move |pct| self.update_track(track.track_type, track.id, pct, track.language.as_deref())
    }

    /// Mark every task finished and signal overall completion
    pub fn complete(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values_mut()
            .for_each(|pct| *pct = 100.0);
        self.forward(ProgressEvent::Complete);
    }

    /// Arithmetic mean of every recorded task percentage
    pub fn overall_progress(&self) -> f32 {
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        if tasks.is_empty() {
            return 0.0;
        }
        tasks.values().sum::<f32>() / tasks.len() as f32
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Child reporter for one batch item.
    ///
    /// Every update of the child is re-emitted on this reporter as an
    /// operation update for item `index + 1` of `total`, carrying the
    /// child's overall progress. Concurrent items never share a task table.
    pub fn file_reporter(self: &Arc<Self>, index: usize, total: usize) -> ProgressReporter {
        ProgressReporter {
            sink: None,
            operation_id: self.operation_id.clone(),
            tasks: Mutex::new(HashMap::new()),
            parent: Some(ParentLink {
                reporter: Arc::clone(self),
                index,
                total,
            }),
        }
    }

    fn record(&self, key: String, percentage: f32) {
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, percentage);
    }

    fn propagate(&self, operation: &str) {
        if let Some(link) = &self.parent {
            link.reporter.update_operation(
                operation,
                link.index + 1,
                link.total,
                self.overall_progress(),
            );
        }
    }

    fn forward(&self, event: ProgressEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| sink(&event))).is_err() {
            error!("Progress sink failed while handling {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting() -> (ProgressSink, Arc<Mutex<Vec<ProgressEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&events);
        let sink: ProgressSink = Arc::new(move |e: &ProgressEvent| {
            captured.lock().unwrap().push(e.clone());
        });
        (sink, events)
    }

    #[test]
    fn percentages_are_clamped() {
        let (sink, events) = collecting();
        let reporter = ProgressReporter::new(Some(sink));
        reporter.update_track(TrackType::Audio, 0, 150.0, Some("eng"));
        reporter.update_track(TrackType::Audio, 1, -5.0, None);
        reporter.update_operation("file", 1, 2, f32::NAN);

        let events = events.lock().unwrap();
        let pcts: Vec<f32> = events.iter().map(|e| e.percentage()).collect();
        assert_eq!(pcts, vec![100.0, 0.0, 0.0]);
    }

    #[test]
    fn overall_progress_is_mean_of_tasks() {
        let reporter = ProgressReporter::default();
        assert_eq!(reporter.overall_progress(), 0.0);
        reporter.update_track(TrackType::Audio, 0, 100.0, None);
        reporter.update_track(TrackType::Subtitle, 0, 50.0, None);
        reporter.update_track(TrackType::Audio, 0, 20.0, None);
        assert_eq!(reporter.task_count(), 2);
        assert!((reporter.overall_progress() - 35.0).abs() < f32::EPSILON);
    }

    #[test]
    fn panicking_sink_does_not_propagate() {
        let sink: ProgressSink = Arc::new(|_: &ProgressEvent| panic!("ui went away"));
        let reporter = ProgressReporter::new(Some(sink));
        reporter.update_track(TrackType::Video, 0, 10.0, None);
        reporter.complete();
        assert_eq!(reporter.task_count(), 1);
    }

    #[test]
    fn file_reporter_reemits_with_file_identity() {
        let (sink, events) = collecting();
        let batch = Arc::new(ProgressReporter::new(Some(sink)));
        let child = batch.file_reporter(2, 5);
        child.update_track(TrackType::Subtitle, 1, 40.0, Some("spa"));
        child.complete();

        let events = events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            &[ProgressEvent::Operation {
                current: 3,
                total: 5,
                percentage: 40.0,
                operation: "subtitle".to_string(),
            }]
        );
        assert_eq!(child.task_count(), 1);
        assert_eq!(batch.task_count(), 1);
    }

    #[test]
    fn file_reporter_forwards_aggregate_progress() {
        let (sink, events) = collecting();
        let batch = Arc::new(ProgressReporter::new(Some(sink)));
        let child = batch.file_reporter(0, 1);
        child.update_track(TrackType::Audio, 0, 100.0, Some("eng"));
        child.update_track(TrackType::Audio, 1, 0.0, Some("jpn"));
        child.update_track(TrackType::Audio, 1, 50.0, Some("jpn"));

        let pcts: Vec<f32> = events.lock().unwrap().iter().map(|e| e.percentage()).collect();
        assert_eq!(pcts, vec![100.0, 50.0, 75.0]);
    }

    #[test]
    fn complete_marks_every_task_finished() {
        let (sink, events) = collecting();
        let reporter = ProgressReporter::new(Some(sink));
        reporter.update_track(TrackType::Audio, 0, 30.0, None);
        reporter.update_operation("analysis", 1, 1, 0.0);
        reporter.complete();

        assert_eq!(reporter.overall_progress(), 100.0);
        assert_eq!(reporter.task_count(), 2);
        assert_eq!(events.lock().unwrap().last(), Some(&ProgressEvent::Complete));
    }

    #[test]
    fn positional_payloads() {
        let track = ProgressEvent::Track {
            track_type: TrackType::Audio,
            track_id: 2,
            percentage: 50.0,
            language: Some("eng".to_string()),
        };
        assert_eq!(track.to_args(), json!(["audio", 2, 50.0, "eng"]));
        assert_eq!(ProgressEvent::Complete.to_args(), json!([null, 0, 100.0, null]));
    }

    #[test]
    fn track_callback_uses_track_key() {
        let reporter = ProgressReporter::default();
        let track = Track {
            id: 3,
            track_type: TrackType::Audio,
            codec: "aac".to_string(),
            language: Some("jpn".to_string()),
            title: None,
            is_default: false,
            is_forced: false,
        };
        {
            let mut cb = reporter.track_callback(&track);
            cb(25.0);
            cb(75.0);
        }
        assert_eq!(reporter.task_count(), 1);
        assert_eq!(reporter.overall_progress(), 75.0);
    }
}
