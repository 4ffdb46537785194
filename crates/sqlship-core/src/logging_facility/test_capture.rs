//! Scoped log capture for assertions in tests
//!
//! `capture` runs a closure with an in-memory subscriber installed on the
//! current thread only. Every event is flattened into text fields, so tests
//! can assert on `op`/`event` pairs, messages and structured values without
//! fighting over a global subscriber.

use crate::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One recorded event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    /// Value of `name`, if the event carried it
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn component(&self) -> Option<&str> {
        self.field(FIELD_COMPONENT)
    }

    /// Formatted message, empty if the event had none
    pub fn message(&self) -> &str {
        self.field("message").unwrap_or("")
    }
}

struct TextFields<'a>(&'a mut BTreeMap<String, String>);

impl Visit for TextFields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Shared sink of captured events; also the layer that fills it
#[derive(Clone, Default)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for TestCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut TextFields(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

impl TestCapture {
    /// Snapshot of everything captured so far, in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(|e| e.message().to_string())
            .collect()
    }

    /// First event for `op` with lifecycle marker `event`
    pub fn find(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.events()
            .into_iter()
            .find(|e| e.op() == Some(op) && e.event() == Some(event))
    }

    /// # Panics
    ///
    /// Panics when no event for `op` carries the marker `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        assert!(
            self.find(op, event).is_some(),
            "no {}/{} event among {} captured",
            op,
            event,
            self.events().len()
        );
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

/// Run `f` with a capturing subscriber installed on the current thread
///
/// # Example
///
/// ```
/// use sqlship_core::log_op_start;
/// use sqlship_core::logging_facility::test_capture::capture;
///
/// let ((), logs) = capture(|| {
///     log_op_start!("my_operation");
/// });
/// logs.assert_event_exists("my_operation", "start");
/// ```
pub fn capture<F, R>(f: F) -> (R, TestCapture)
where
    F: FnOnce() -> R,
{
    let logs = TestCapture::default();
    let subscriber = tracing_subscriber::registry().with(logs.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
