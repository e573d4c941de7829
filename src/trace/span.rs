//! Spans represent a single operation within a trace.
//!
//! A span's start time is set on creation. After creation it is possible to
//! set attributes, add timestamped events and change its status. Once its end
//! time has been set by [`Span::end`] the span body is handed to the
//! registered exporters and all further mutation is silently ignored.

use crate::common::KeyValue;
use crate::trace::span_context::{SpanContext, SpanId};
use crate::trace::tracer::Tracer;
use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Describes the relationship between the span and its parent/children
/// across a process boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpanKind {
    /// A request to some remote service; usually the parent of a remote
    /// `Server` span. Does not end until the response is received.
    Client,

    /// Server-side handling of a synchronous remote request; often the child
    /// of a remote `Client` span.
    Server,

    /// The initiator of an asynchronous request, e.g. a message send. May end
    /// before the corresponding `Consumer` span starts.
    Producer,

    /// The handler of an asynchronous `Producer` request.
    Consumer,

    /// An internal operation with no remote parent or children.
    Internal,
}

/// The status of a span.
///
/// These values form a total order: Ok > Error > Unset. Once a span has been
/// marked `Ok` that decision is final and later error reports no longer
/// change it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd)]
pub enum Status {
    /// The default status.
    Unset,

    /// The operation contains an error.
    Error {
        /// The description of the error
        description: Cow<'static, str>,
    },

    /// The operation completed successfully, as validated by an application
    /// developer or operator.
    Ok,
}

impl Status {
    /// Create a new error status with a given description.
    pub fn error(description: impl Into<Cow<'static, str>>) -> Self {
        Status::Error {
            description: description.into(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unset
    }
}

/// A timestamped event describing something that happened during a span's
/// lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// The name of this event.
    pub name: Cow<'static, str>,
    /// The time at which this event occurred.
    pub timestamp: SystemTime,
    /// The attributes describing this event.
    pub attributes: Vec<KeyValue>,
}

impl Event {
    /// Create a new event with the current timestamp.
    pub fn new(name: impl Into<Cow<'static, str>>, attributes: Vec<KeyValue>) -> Self {
        Event {
            name: name.into(),
            timestamp: SystemTime::now(),
            attributes,
        }
    }
}

/// All the information collected by a span, handed to exporters once the
/// span has ended.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanData {
    /// Exportable `SpanContext`.
    pub span_context: SpanContext,
    /// Span parent id, `SpanId::INVALID` for root spans.
    pub parent_span_id: SpanId,
    /// Span kind.
    pub span_kind: SpanKind,
    /// Span name.
    pub name: Cow<'static, str>,
    /// Span start time.
    pub start_time: SystemTime,
    /// Span end time.
    pub end_time: SystemTime,
    /// Span attributes.
    pub attributes: Vec<KeyValue>,
    /// Span events.
    pub events: Vec<Event>,
    /// Span status.
    pub status: Status,
    /// Whether the parent was resolved from a remote carrier.
    pub has_remote_parent: bool,
}

impl SpanData {
    /// Returns the value of the named attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<&crate::common::Value> {
        self.attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }
}

/// Single operation within a trace.
///
/// The handle is cheap to clone; all clones share the same span body, so the
/// same logical span can live both in an execution context slot and with the
/// caller that started it. Ending any clone ends the span for all of them.
#[derive(Clone, Debug)]
pub struct Span {
    span_context: SpanContext,
    data: Arc<Mutex<Option<SpanData>>>,
    tracer: Tracer,
}

impl Span {
    pub(crate) fn new(data: SpanData, tracer: Tracer) -> Self {
        Span {
            span_context: data.span_context,
            data: Arc::new(Mutex::new(Some(data))),
            tracer,
        }
    }

    /// Returns the `SpanContext` for this span.
    pub fn span_context(&self) -> &SpanContext {
        &self.span_context
    }

    /// Returns `true` if this span is still recording information.
    pub fn is_recording(&self) -> bool {
        self.data
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Sets a single attribute on this span, replacing any previous value
    /// recorded under the same key.
    pub fn set_attribute(&self, attribute: KeyValue) {
        self.with_data(|data| {
            match data
                .attributes
                .iter_mut()
                .find(|kv| kv.key == attribute.key)
            {
                Some(existing) => existing.value = attribute.value,
                None => data.attributes.push(attribute),
            }
        });
    }

    /// Records an event with the current timestamp.
    pub fn add_event(&self, name: impl Into<Cow<'static, str>>, attributes: Vec<KeyValue>) {
        self.add_event_with_timestamp(name, SystemTime::now(), attributes)
    }

    /// Records an event at a specific time.
    pub fn add_event_with_timestamp(
        &self,
        name: impl Into<Cow<'static, str>>,
        timestamp: SystemTime,
        attributes: Vec<KeyValue>,
    ) {
        let name = name.into();
        self.with_data(|data| {
            data.events.push(Event {
                name,
                timestamp,
                attributes,
            })
        });
    }

    /// Sets the status of this span.
    ///
    /// Only the highest status per the `Ok > Error > Unset` ordering is kept.
    pub fn set_status(&self, status: Status) {
        self.with_data(|data| {
            if status > data.status {
                data.status = status;
            }
        });
    }

    /// Finishes the span, making it eligible for export.
    pub fn end(&self) {
        self.end_with_timestamp(SystemTime::now())
    }

    /// Finishes the span with the given timestamp.
    pub fn end_with_timestamp(&self, timestamp: SystemTime) {
        // Take the body out of the mutex, marking the span as ended.
        let data = match self.data.lock().ok().and_then(|mut guard| guard.take()) {
            Some(mut data) => {
                data.end_time = timestamp;
                data
            }
            None => {
                tracing::debug!(
                    span_id = %self.span_context.span_id(),
                    "attempted to end an already ended span"
                );
                return;
            }
        };
        self.tracer.export(data);
    }

    /// Operate on a mutable reference to the span body. No-op once ended.
    fn with_data<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut SpanData) -> T,
    {
        self.data
            .lock()
            .ok()
            .and_then(|mut guard| guard.as_mut().map(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::in_memory::InMemorySpanExporter;
    use crate::trace::tracer::Tracer;

    fn test_tracer() -> (Tracer, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::new();
        let tracer = Tracer::new("test-service", vec![Box::new(exporter.clone())]);
        (tracer, exporter)
    }

    #[test]
    fn status_order() {
        assert!(Status::Ok > Status::error(""));
        assert!(Status::error("") > Status::Unset);
    }

    #[test]
    fn end_is_idempotent() {
        let (tracer, exporter) = test_tracer();
        let span = tracer.start_span("op", SpanKind::Internal, None);

        assert!(span.is_recording());
        span.end();
        assert!(!span.is_recording());
        span.end();

        assert_eq!(exporter.finished_spans().unwrap().len(), 1);
    }

    #[test]
    fn clones_share_one_body() {
        let (tracer, exporter) = test_tracer();
        let span = tracer.start_span("op", SpanKind::Internal, None);
        let clone = span.clone();

        span.set_attribute(KeyValue::new("left", true));
        clone.set_attribute(KeyValue::new("right", true));
        clone.end();
        span.end();

        let finished = exporter.finished_spans().unwrap();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].attribute("left").is_some());
        assert!(finished[0].attribute("right").is_some());
    }

    #[test]
    fn set_attribute_replaces_existing_key() {
        let (tracer, exporter) = test_tracer();
        let span = tracer.start_span("op", SpanKind::Internal, None);
        span.set_attribute(KeyValue::new("error", false));
        span.set_attribute(KeyValue::new("error", true));
        span.end();

        let finished = exporter.finished_spans().unwrap();
        let hits: Vec<_> = finished[0]
            .attributes
            .iter()
            .filter(|kv| kv.key.as_str() == "error")
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, crate::common::Value::Bool(true));
    }

    #[test]
    fn mutation_after_end_is_ignored() {
        let (tracer, exporter) = test_tracer();
        let span = tracer.start_span("op", SpanKind::Internal, None);
        span.end();

        span.set_attribute(KeyValue::new("late", true));
        span.add_event("late", Vec::new());
        span.set_status(Status::error("late"));

        let finished = exporter.finished_spans().unwrap();
        assert!(finished[0].attribute("late").is_none());
        assert!(finished[0].events.is_empty());
        assert_eq!(finished[0].status, Status::Unset);
    }

    #[test]
    fn ok_status_is_final() {
        let (tracer, exporter) = test_tracer();
        let span = tracer.start_span("op", SpanKind::Internal, None);
        span.set_status(Status::Ok);
        span.set_status(Status::error("boom"));
        span.end();

        assert_eq!(exporter.finished_spans().unwrap()[0].status, Status::Ok);
    }
}
