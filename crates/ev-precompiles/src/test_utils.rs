//! test utilities for verifying log output.

use std::sync::{Arc, Mutex};
use tracing::{
    field::{Field, Visit},
    subscriber::set_default,
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    Layer,
};

/// a recorded event with its level, target and message.
#[derive(Debug, Clone)]
pub(crate) struct EventRecord {
    pub(crate) level: Level,
    pub(crate) target: String,
    pub(crate) message: String,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// a tracing layer that records events for test assertions.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventCollector {
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl EventCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// events recorded at `level` or more severe.
    pub(crate) fn at_least(&self, level: Level) -> Vec<EventRecord> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level <= level)
            .cloned()
            .collect()
    }

    /// installs this collector as the default subscriber for the current thread.
    pub(crate) fn as_default(&self) -> tracing::subscriber::DefaultGuard {
        set_default(tracing_subscriber::registry().with(self.clone()))
    }
}

impl<S: Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(EventRecord {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.0,
        });
    }
}
