//! Forwards `tracing` events to a [`Logger`].
//!
//! `tracing` plays the role of the process console here: [`replace`] routes
//! every event of the current thread to the logger only, [`augment`] routes
//! them to the logger and to the subscriber that was in place before. Dropping (or
//! [`restoring`](ConsoleGuard::restore)) the returned guard puts the previous
//! subscriber back.
//!
//! Events emitted by this crate are never forwarded.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::subscriber::{DefaultGuard, NoSubscriber};
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

use crate::delivery::DeliveryState;
use crate::logger::{append_record, Logger};
use crate::record::{serialize, Level};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// `tracing_subscriber` layer appending one record per event.
pub struct ConsoleLayer {
    state: Arc<Mutex<DeliveryState>>,
}

impl ConsoleLayer {
    /// The layer only buffers: records are shipped as long as `logger` is alive.
    pub fn new(logger: &Logger) -> Self {
        ConsoleLayer {
            state: logger.state(),
        }
    }
}

fn is_own_event(target: &str) -> bool {
    target == CRATE_TARGET
        || (target.starts_with(CRATE_TARGET) && target[CRATE_TARGET.len()..].starts_with("::"))
}

fn record_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        _ => Level::Info,
    }
}

#[derive(Default)]
struct JsonVisitor {
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    // A lone message is shipped as a plain string.
    fn into_data(mut self) -> String {
        if self.fields.len() == 1 {
            if let Some(Value::String(message)) = self.fields.remove("message") {
                return serialize(&message);
            }
        }
        serialize(&self.fields)
    }
}

impl Visit for JsonVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, Value::from(format!("{:?}", value)));
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_event(metadata.target()) {
            return;
        }
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        append_record(&self.state, record_level(metadata.level()), visitor.into_data());
    }
}

/// Restores the previous subscriber of the current thread when dropped.
#[must_use = "the previous subscriber is restored as soon as the guard is dropped"]
pub struct ConsoleGuard {
    _default_guard: DefaultGuard,
}

impl ConsoleGuard {
    pub fn restore(self) {}
}

/// Sends the events of the current thread to `logger` only.
pub fn replace(logger: &Logger) -> ConsoleGuard {
    let subscriber = Registry::default().with(ConsoleLayer::new(logger));
    ConsoleGuard {
        _default_guard: tracing::subscriber::set_default(subscriber),
    }
}

/// Hands events over to the subscriber that was the default before.
struct ForwardLayer {
    previous: Dispatch,
}

impl<S: Subscriber> Layer<S> for ForwardLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if self.previous.enabled(event.metadata()) {
            self.previous.event(event);
        }
    }
}

/// Sends the events of the current thread to `logger`, and to the subscriber
/// in place until now, with its own filters and format.
///
/// Only events are passed on: the previous subscriber does not see spans
/// entered while the guard lives. Without any previous subscriber, events
/// are printed with the default `fmt` format.
pub fn augment(logger: &Logger) -> ConsoleGuard {
    let previous = tracing::dispatcher::get_default(|dispatch| dispatch.clone());
    let (forward_layer, fmt_layer) = if previous.is::<NoSubscriber>() {
        (None, Some(tracing_subscriber::fmt::layer()))
    } else {
        (Some(ForwardLayer { previous }), None)
    };
    let subscriber = Registry::default()
        .with(forward_layer)
        .with(fmt_layer)
        .with(ConsoleLayer::new(logger));
    ConsoleGuard {
        _default_guard: tracing::subscriber::set_default(subscriber),
    }
}
