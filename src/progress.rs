//! Progress event channel
//!
//! Observability side-channel for the fixed pipeline: one event carrying the
//! assembled context, one carrying the final prompt. Emission never gates
//! the run: sinks are infallible and an absent listener is a no-op.

use std::sync::{Arc, Mutex, RwLock};

/// Progress event types emitted during a run
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Assembled context text, emitted after retrieval formatting
    Context { text: String },

    /// Final prompt text, emitted before the model call
    Prompt { text: String },
}

impl ProgressEvent {
    /// Stable event name for external sinks
    pub fn name(&self) -> &'static str {
        match self {
            ProgressEvent::Context { .. } => "context",
            ProgressEvent::Prompt { .. } => "prompt",
        }
    }

    /// Event payload text
    pub fn text(&self) -> &str {
        match self {
            ProgressEvent::Context { text } | ProgressEvent::Prompt { text } => text,
        }
    }
}

/// Receiver of progress events.
///
/// Implementations must not block for long and cannot fail; anything fallible
/// (I/O, network) belongs behind the implementation's own buffering.
pub trait ProgressSink: Send + Sync {
    /// Observe one event
    fn on_event(&self, event: &ProgressEvent);
}

/// Fan-out channel for progress events
#[derive(Clone, Default)]
pub struct ProgressChannel {
    sinks: Arc<RwLock<Vec<Arc<dyn ProgressSink>>>>,
}

impl ProgressChannel {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink
    pub fn register(&self, sink: Arc<dyn ProgressSink>) {
        let mut sinks = self.sinks.write().unwrap_or_else(|e| e.into_inner());
        sinks.push(sink);
    }

    /// Emit an event to every registered sink.
    ///
    /// Infallible: a poisoned lock is recovered rather than propagated, so
    /// emission can never abort the pipeline run that triggered it.
    pub fn emit(&self, event: ProgressEvent) {
        let sinks = self.sinks.read().unwrap_or_else(|e| e.into_inner());
        for sink in sinks.iter() {
            sink.on_event(&event);
        }
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// In-memory sink that records every event it sees
#[derive(Clone, Default)]
pub struct ProgressCollector {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of collected events in emission order
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of collected events
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether nothing has been collected yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProgressSink for ProgressCollector {
    fn on_event(&self, event: &ProgressEvent) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let channel = ProgressChannel::new();
        channel.emit(ProgressEvent::Context {
            text: "ctx".to_string(),
        });
        assert_eq!(channel.sink_count(), 0);
    }

    #[test]
    fn test_collector_records_in_order() {
        let channel = ProgressChannel::new();
        let collector = ProgressCollector::new();
        channel.register(Arc::new(collector.clone()));

        channel.emit(ProgressEvent::Context {
            text: "the context".to_string(),
        });
        channel.emit(ProgressEvent::Prompt {
            text: "the prompt".to_string(),
        });

        let events = collector.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "context");
        assert_eq!(events[0].text(), "the context");
        assert_eq!(events[1].name(), "prompt");
    }

    #[test]
    fn test_multiple_sinks_all_observe() {
        let channel = ProgressChannel::new();
        let a = ProgressCollector::new();
        let b = ProgressCollector::new();
        channel.register(Arc::new(a.clone()));
        channel.register(Arc::new(b.clone()));

        channel.emit(ProgressEvent::Prompt {
            text: "p".to_string(),
        });

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }
}
