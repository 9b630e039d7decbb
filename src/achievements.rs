//! Collection notifications
//!
//! The simulation queues [`VizEvent`]s; the loop driver forwards them to a
//! [`CollectionSink`] once per frame. [`CollectionLog`] is the in-memory sink
//! the page uses for toasts and the achievement counter.

use crate::catalog::Tag;
use crate::consts::TOAST_DURATION_MS;
use crate::sim::VizEvent;

/// Receiver for collection and data-flow notifications
pub trait CollectionSink {
    fn notify(&mut self, event: &VizEvent);
}

impl CollectionSink for Vec<VizEvent> {
    fn notify(&mut self, event: &VizEvent) {
        self.push(event.clone());
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CollectionSink for NullSink {
    fn notify(&mut self, _event: &VizEvent) {}
}

/// One collected topic
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub topic: String,
    pub tag: Tag,
    /// Times collected
    pub hits: u32,
}

/// Distinct collected topics in first-collected order
#[derive(Debug, Clone, Default)]
pub struct CollectionLog {
    pub entries: Vec<CollectionEntry>,
    /// Data-flow notifications seen
    pub flows: u32,
}

impl CollectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a collection. Returns true the first time a topic is collected.
    pub fn record(&mut self, topic: &str, tag: Tag) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.topic == topic) {
            entry.hits += 1;
            return false;
        }
        self.entries.push(CollectionEntry {
            topic: topic.to_string(),
            tag,
            hits: 1,
        });
        true
    }

    pub fn is_collected(&self, topic: &str) -> bool {
        self.entries.iter().any(|e| e.topic == topic)
    }

    /// Distinct topics collected
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// All collections including repeats
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.hits).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently first-collected topic
    pub fn latest(&self) -> Option<&CollectionEntry> {
        self.entries.last()
    }
}

impl CollectionSink for CollectionLog {
    fn notify(&mut self, event: &VizEvent) {
        match event {
            VizEvent::Collected { topic, tag } => {
                self.record(topic, *tag);
            }
            VizEvent::DataFlow { .. } => self.flows += 1,
        }
    }
}

/// Visibility window of the collection toast, in host milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ToastTimer {
    hide_at: Option<f64>,
}

impl ToastTimer {
    /// Show (or re-show) at `now`; a newer toast extends the window
    pub fn show(&mut self, now: f64) {
        self.hide_at = Some(now + TOAST_DURATION_MS);
    }

    pub fn is_visible(&self) -> bool {
        self.hide_at.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline
    pub fn expire(&mut self, now: f64) -> bool {
        match self.hide_at {
            Some(at) if now >= at => {
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Toast headline and body for a notification
pub fn toast_text(event: &VizEvent) -> (String, String) {
    let tag = event.tag();
    match (event, tag) {
        (VizEvent::Collected { topic, .. }, Tag::Category(c)) => (
            "Circuit Activated!".to_string(),
            format!("{} {} Module", topic, c.as_str().to_uppercase()),
        ),
        (VizEvent::Collected { topic, .. }, Tag::Tier(t)) => (
            "Topic Caught!".to_string(),
            format!("{} ({})", topic, t.as_str()),
        ),
        (VizEvent::DataFlow { topic, .. }, _) => (
            "Data Flowing".to_string(),
            format!("{} is sending packets", topic),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Tier};

    fn collected(topic: &str, tag: Tag) -> VizEvent {
        VizEvent::Collected {
            topic: topic.into(),
            tag,
        }
    }

    #[test]
    fn test_record_dedups() {
        let mut log = CollectionLog::new();
        assert!(log.record("Networks", Tag::Category(Category::Network)));
        assert!(!log.record("Networks", Tag::Category(Category::Network)));
        assert!(log.record("Storage", Tag::Category(Category::Memory)));
        assert_eq!(log.distinct(), 2);
        assert_eq!(log.total(), 3);
        assert_eq!(log.latest().map(|e| e.topic.as_str()), Some("Storage"));
        assert!(log.is_collected("Networks"));
        assert!(!log.is_collected("Internet"));
    }

    #[test]
    fn test_sink_counts_flows() {
        let mut log = CollectionLog::new();
        log.notify(&collected("Security", Tag::Category(Category::Shield)));
        log.notify(&VizEvent::DataFlow {
            topic: "Security".into(),
            tag: Tag::Category(Category::Shield),
        });
        assert_eq!(log.distinct(), 1);
        assert_eq!(log.flows, 1);
    }

    #[test]
    fn test_toast_text() {
        let (title, body) = toast_text(&collected("Hardware", Tag::Category(Category::Memory)));
        assert_eq!(title, "Circuit Activated!");
        assert_eq!(body, "Hardware MEMORY Module");
        let (_, body) = toast_text(&collected("Storage", Tag::Tier(Tier::Intermediate)));
        assert_eq!(body, "Storage (intermediate)");
    }

    #[test]
    fn test_toast_hides_after_duration() {
        let mut toast = ToastTimer::default();
        assert!(!toast.expire(0.0));

        toast.show(1000.0);
        assert!(toast.is_visible());
        assert!(!toast.expire(3999.0));
        assert!(toast.expire(4000.0));
        assert!(!toast.is_visible());
        assert!(!toast.expire(5000.0));

        // a second collection restarts the window
        toast.show(0.0);
        toast.show(2000.0);
        assert!(!toast.expire(3000.0));
        assert!(toast.expire(5000.0));
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<VizEvent> = Vec::new();
        sink.notify(&collected("Internet", Tag::Category(Category::Network)));
        assert_eq!(sink.len(), 1);
    }
}
