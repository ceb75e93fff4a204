//! In-memory capture of tracing events for test assertions
//!
//! The capture subscriber is process-wide, so tests filter by an op name or a
//! field value (namespace, plan) unique to them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::kdev_core_types::schema::{FIELD_EVENT, FIELD_OP};

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

/// One captured event, every field rendered to a string
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    /// `start`, `end` or `end_error` for boundary events
    pub fn event_name(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event_name() == Some(event)
    }
}

struct Fields<'a>(&'a mut BTreeMap<String, String>);

impl Fields<'_> {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for Fields<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

struct SinkLayer(Sink);

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        event.record(&mut Fields(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut sink) = self.0.lock() {
            sink.push(captured);
        }
    }
}

/// Handle onto everything captured since the subscriber was installed
#[derive(Clone)]
pub struct TestCapture {
    sink: Sink,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.matching(|_| true)
    }

    /// Captured events accepted by `pred`, oldest first
    pub fn matching(&self, pred: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        match self.sink.lock() {
            Ok(sink) => sink.iter().filter(|e| pred(e)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.op() == Some(op))
    }

    /// Most recent boundary event for `op`
    pub fn find(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.matching(|e| e.is(op, event)).pop()
    }

    /// # Panics
    ///
    /// Panics if nothing matching `op`/`event` was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        if self.find(op, event).is_none() {
            let seen: Vec<String> = self
                .events_for_op(op)
                .iter()
                .filter_map(|e| e.event_name().map(str::to_owned))
                .collect();
            panic!("no {event} event for op {op}; saw {seen:?}");
        }
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber on first use and return a handle to it
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let sink: Sink = Arc::default();
            // a subscriber may already be set in this process
            let _ = tracing_subscriber::registry()
                .with(SinkLayer(sink.clone()))
                .try_init();
            TestCapture { sink }
        })
        .clone()
}
