use super::{ProgressEvent, ProgressSink};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Window in which an identical payload is not resent
pub const DUPLICATE_WINDOW: Duration = Duration::from_millis(100);

/// Sink wrapper that drops an event identical to the previous one when it
/// arrives within the duplicate window
pub struct ThrottledSink {
    inner: ProgressSink,
    window: Duration,
    last: Mutex<Option<(ProgressEvent, Instant)>>,
}

impl ThrottledSink {
    pub fn new(inner: ProgressSink) -> Self {
        Self::with_window(inner, DUPLICATE_WINDOW)
    }

    pub fn with_window(inner: ProgressSink, window: Duration) -> Self {
        Self {
            inner,
            window,
            last: Mutex::new(None),
        }
    }

    /// Forward an event unless it duplicates the last one; returns whether it was sent
    pub fn forward(&self, event: &ProgressEvent) -> bool {
        let now = Instant::now();
        {
            let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((previous, sent_at)) = last.as_ref()
                && previous == event
                && now.duration_since(*sent_at) < self.window
            {
                return false;
            }
            *last = Some((event.clone(), now));
        }
        (self.inner)(event);
        true
    }

    pub fn into_sink(self) -> ProgressSink {
        let this = Arc::new(self);
        Arc::new(move |event: &ProgressEvent| {
            this.forward(event);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracks::TrackType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(pct: f32) -> ProgressEvent {
        ProgressEvent::Track {
            track_type: TrackType::Audio,
            track_id: 0,
            percentage: pct,
            language: None,
        }
    }

    fn counting() -> (ProgressSink, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let sink: ProgressSink = Arc::new(move |_: &ProgressEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (sink, count)
    }

    #[test]
    fn suppresses_recent_duplicates() {
        let (sink, count) = counting();
        let throttled = ThrottledSink::with_window(sink, Duration::from_secs(60));
        assert!(throttled.forward(&event(10.0)));
        assert!(!throttled.forward(&event(10.0)));
        assert!(throttled.forward(&event(20.0)));
        assert!(throttled.forward(&event(10.0)));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn resends_after_window() {
        let (sink, count) = counting();
        let throttled = ThrottledSink::with_window(sink, Duration::from_millis(5));
        throttled.forward(&event(50.0));
        std::thread::sleep(Duration::from_millis(20));
        throttled.forward(&event(50.0));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn works_as_plain_sink() {
        let (sink, count) = counting();
        let sink = ThrottledSink::with_window(sink, Duration::from_secs(60)).into_sink();
        sink(&ProgressEvent::Complete);
        sink(&ProgressEvent::Complete);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
