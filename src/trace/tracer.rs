//! The span factory and export pipeline.
//!
//! A [`Tracer`] owns the id generator, the `service.name` resource value and
//! the registered exporter sinks. Spans started by a tracer hand their body
//! back to it on end, and the tracer fans the finished span out to every
//! sink. Sink failures are logged and isolated; they never reach the traced
//! request path.

use crate::common::KeyValue;
use crate::export::SpanExporter;
use crate::semconv;
use crate::trace::id_generator::{IdGenerator, RandomIdGenerator};
use crate::trace::span::{Span, SpanData, SpanKind, Status};
use crate::trace::span_context::{SpanContext, SpanId, TraceFlags};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::SystemTime;

/// Creates spans and delivers finished spans to the registered exporters.
///
/// Tracers are cheap to clone and all clones share the same pipeline.
#[derive(Clone, Debug)]
pub struct Tracer {
    inner: Arc<TracerInner>,
}

#[derive(Debug)]
struct TracerInner {
    service_name: Cow<'static, str>,
    id_generator: Box<dyn IdGenerator>,
    exporters: Vec<Box<dyn SpanExporter>>,
}

impl Tracer {
    /// Create a new tracer with the default random id generator.
    pub fn new(
        service_name: impl Into<Cow<'static, str>>,
        exporters: Vec<Box<dyn SpanExporter>>,
    ) -> Self {
        Self::with_id_generator(service_name, Box::new(RandomIdGenerator::default()), exporters)
    }

    /// Create a new tracer with a custom id generator.
    pub fn with_id_generator(
        service_name: impl Into<Cow<'static, str>>,
        id_generator: Box<dyn IdGenerator>,
        exporters: Vec<Box<dyn SpanExporter>>,
    ) -> Self {
        Tracer {
            inner: Arc::new(TracerInner {
                service_name: service_name.into(),
                id_generator,
                exporters,
            }),
        }
    }

    /// The `service.name` value stamped on every span this tracer finishes.
    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }

    /// Start a new span.
    ///
    /// A valid `parent` determines the trace id, the parent span id and
    /// whether the parent was remote; otherwise the span becomes the root of
    /// a fresh trace.
    pub fn start_span(
        &self,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
        parent: Option<&SpanContext>,
    ) -> Span {
        let generator = &self.inner.id_generator;
        let (trace_id, parent_span_id, has_remote_parent) = match parent.filter(|p| p.is_valid()) {
            Some(parent) => (parent.trace_id(), parent.span_id(), parent.is_remote()),
            None => (generator.new_trace_id(), SpanId::INVALID, false),
        };

        let span_context =
            SpanContext::new(trace_id, generator.new_span_id(), TraceFlags::SAMPLED, false);
        let now = SystemTime::now();

        Span::new(
            SpanData {
                span_context,
                parent_span_id,
                span_kind: kind,
                name: name.into(),
                start_time: now,
                end_time: now,
                attributes: Vec::new(),
                events: Vec::new(),
                status: Status::Unset,
                has_remote_parent,
            },
            self.clone(),
        )
    }

    /// Deliver a finished span to every registered exporter.
    ///
    /// Called from `Span::end`. A failing sink must not affect delivery to
    /// the others, so per-sink errors are logged and swallowed here.
    pub(crate) fn export(&self, mut data: SpanData) {
        data.attributes.push(KeyValue::new(
            semconv::SERVICE_NAME,
            self.inner.service_name.clone(),
        ));

        for exporter in &self.inner.exporters {
            if let Err(err) = exporter.export(&data) {
                tracing::debug!(
                    error = %err,
                    span_id = %data.span_context.span_id(),
                    "span export failed"
                );
            }
        }
    }

    /// Shut down every registered exporter.
    pub fn shutdown(&self) {
        for exporter in &self.inner.exporters {
            exporter.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::in_memory::InMemorySpanExporter;
    use crate::export::{ExportResult, SpanExporter};
    use crate::trace::id_generator::IncrementIdGenerator;
    use crate::trace::span_context::TraceId;

    #[derive(Debug)]
    struct FailingExporter;

    impl SpanExporter for FailingExporter {
        fn export(&self, _span: &SpanData) -> ExportResult {
            Err(crate::error::ExportError::Internal("sink offline".into()))
        }
    }

    #[test]
    fn root_span_gets_fresh_trace_id() {
        let tracer = Tracer::with_id_generator(
            "svc",
            Box::new(IncrementIdGenerator::new()),
            Vec::new(),
        );
        let span = tracer.start_span("root", SpanKind::Server, None);

        assert_eq!(span.span_context().trace_id(), TraceId::from(1_u128));
        assert!(span.span_context().is_sampled());
        assert!(!span.span_context().is_remote());
    }

    #[test]
    fn child_span_inherits_trace_id() {
        let tracer = Tracer::new("svc", Vec::new());
        let parent = tracer.start_span("parent", SpanKind::Server, None);
        let child = tracer.start_span("child", SpanKind::Client, Some(parent.span_context()));

        assert_eq!(
            child.span_context().trace_id(),
            parent.span_context().trace_id()
        );
        assert_ne!(child.span_context().span_id(), parent.span_context().span_id());
    }

    #[test]
    fn invalid_parent_starts_a_new_trace() {
        let tracer = Tracer::new("svc", Vec::new());
        let span = tracer.start_span("root", SpanKind::Server, Some(&SpanContext::NONE));

        assert_ne!(span.span_context().trace_id(), TraceId::INVALID);
    }

    #[test]
    fn fan_out_survives_failing_sink() {
        let healthy = InMemorySpanExporter::new();
        let tracer = Tracer::new(
            "svc",
            vec![Box::new(FailingExporter), Box::new(healthy.clone())],
        );

        tracer.start_span("op", SpanKind::Internal, None).end();

        assert_eq!(healthy.finished_spans().unwrap().len(), 1);
    }

    #[test]
    fn finished_spans_carry_service_name() {
        let exporter = InMemorySpanExporter::new();
        let tracer = Tracer::new("checkout", vec![Box::new(exporter.clone())]);

        tracer.start_span("op", SpanKind::Internal, None).end();

        let finished = exporter.finished_spans().unwrap();
        assert_eq!(
            finished[0].attribute(semconv::SERVICE_NAME).unwrap().as_str(),
            "checkout"
        );
    }
}
