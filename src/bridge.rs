//! The tracer bridge.
//!
//! [`TraceBridge`] sits between a host networked framework and the trace
//! pipeline. The host calls the four lifecycle operations at its
//! request/response boundaries:
//!
//! - [`receive_request`](TraceBridge::receive_request) when an inbound
//!   request arrives,
//! - [`send_response`](TraceBridge::send_response) when its response leaves,
//! - [`send_request`](TraceBridge::send_request) when an outbound call
//!   starts,
//! - [`receive_response`](TraceBridge::receive_response) when that call's
//!   response comes back.
//!
//! The bridge decodes and injects trace context through the W3C
//! [`TraceContextPropagator`], parents spans across those boundaries and
//! keeps the active server span in the per-request [`ExecutionContext`].
//!
//! None of the lifecycle operations returns an error or panics on malformed
//! input: tracing must never break the traced application. Failures are
//! absorbed into span state (error events, status) or ignored (malformed
//! carriers become fresh roots).

use crate::common::KeyValue;
use crate::context::ExecutionContext;
use crate::propagation::{Extractor, Injector, TraceContextPropagator};
use crate::semconv;
use crate::trace::{Span, SpanKind, Status, Tracer};
use std::borrow::Cow;

/// Enumerates the attributes of a host request or response object.
///
/// Implementations must be deterministic and side-effect-free: for a given
/// object, `len` calls with `index` in `0..len(obj)` always yield the same
/// pairs.
pub trait TagExtractor<T: ?Sized> {
    /// The number of attributes the object carries.
    fn len(&self, obj: &T) -> usize;

    /// The name of the attribute at `index`.
    fn name(&self, obj: &T, index: usize) -> String;

    /// The value of the attribute at `index`.
    fn value(&self, obj: &T, index: usize) -> String;
}

/// A tag extractor yielding no attributes, for objects with nothing to report.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyTags;

impl<T: ?Sized> TagExtractor<T> for EmptyTags {
    fn len(&self, _obj: &T) -> usize {
        0
    }

    fn name(&self, _obj: &T, _index: usize) -> String {
        String::new()
    }

    fn value(&self, _obj: &T, _index: usize) -> String {
        String::new()
    }
}

/// Reports whether a response carries a protocol-level functional error.
///
/// Implemented once per transport kind instead of inspecting concrete
/// response types at runtime. A functional error is one the backend reported
/// inside a successfully transported response, as opposed to a transport
/// failure surfaced separately through the `failure` argument of the
/// finalizing operations.
pub trait ResponseStatus {
    /// `true` if the response reports a backend error.
    fn is_error(&self) -> bool;

    /// Human-readable status text for the error event message.
    fn status_text(&self) -> String;
}

/// [`ResponseStatus`] for HTTP responses.
///
/// Only status code 500 is classified as a functional error; other error
/// classes are deliberately left unclassified.
#[derive(Clone, Debug)]
pub struct HttpResponseStatus {
    /// The response status code.
    pub status_code: u16,
    /// The response status message.
    pub status_message: String,
}

impl ResponseStatus for HttpResponseStatus {
    fn is_error(&self) -> bool {
        self.status_code == 500
    }

    fn status_text(&self) -> String {
        self.status_message.clone()
    }
}

/// [`ResponseStatus`] for responses with no functional-error signal, such as
/// messaging replies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResponseStatus;

impl ResponseStatus for NoResponseStatus {
    fn is_error(&self) -> bool {
        false
    }

    fn status_text(&self) -> String {
        String::new()
    }
}

/// Bridges host request/response boundaries into distributed-trace spans.
///
/// Build one through [`BridgeConfig::build`]; the bridge owns its tracer's
/// shutdown only when it built the tracer itself.
///
/// [`BridgeConfig::build`]: crate::config::BridgeConfig::build
#[derive(Debug)]
pub struct TraceBridge {
    tracer: Tracer,
    owns_tracer: bool,
    component: Cow<'static, str>,
    propagator: TraceContextPropagator,
}

impl TraceBridge {
    pub(crate) fn new(tracer: Tracer, owns_tracer: bool, component: Cow<'static, str>) -> Self {
        TraceBridge {
            tracer,
            owns_tracer,
            component,
            propagator: TraceContextPropagator::new(),
        }
    }

    /// The tracer this bridge creates spans with.
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Handle an inbound request: the server leg of the lifecycle.
    ///
    /// Decodes the carrier to recover the upstream trace context; an absent
    /// or malformed carrier yields a fresh root rather than a failure. The
    /// new `SpanKind::Server` span is tagged with the component
    /// discriminator and every pair the tag extractor yields, then stored as
    /// the context's active span.
    pub fn receive_request<R: ?Sized>(
        &self,
        cx: &mut ExecutionContext,
        request: &R,
        operation: &str,
        carrier: &dyn Extractor,
        tags: &dyn TagExtractor<R>,
    ) -> Span {
        self.receive_request_with_kind(cx, request, operation, SpanKind::Server, carrier, tags)
    }

    /// [`receive_request`](Self::receive_request) with an explicit span kind,
    /// for messaging hosts that record the consumer leg as
    /// `SpanKind::Consumer`.
    pub fn receive_request_with_kind<R: ?Sized>(
        &self,
        cx: &mut ExecutionContext,
        request: &R,
        operation: &str,
        kind: SpanKind,
        carrier: &dyn Extractor,
        tags: &dyn TagExtractor<R>,
    ) -> Span {
        let parent = self.propagator.extract(carrier);
        let parent = parent.is_valid().then_some(parent);

        let span = self
            .tracer
            .start_span(operation.to_owned(), kind, parent.as_ref());
        span.set_attribute(KeyValue::new(semconv::COMPONENT, self.component.clone()));
        self.copy_tags(&span, request, tags);

        cx.set_active_span(span.clone());
        span
    }

    /// Finalize the server leg: clear the active-span association, record
    /// failure and functional-error events, copy response attributes and end
    /// the span.
    ///
    /// A `None` span makes this a no-op, so uninstrumented paths can call it
    /// unconditionally. The span is ended exactly once per matching
    /// [`receive_request`](Self::receive_request).
    pub fn send_response<R, E>(
        &self,
        cx: &mut ExecutionContext,
        response: Option<&R>,
        span: Option<Span>,
        failure: Option<&E>,
        tags: &dyn TagExtractor<R>,
    ) where
        R: ResponseStatus + ?Sized,
        E: std::error::Error + ?Sized,
    {
        let Some(span) = span else { return };
        cx.clear_active_span();
        self.finish_span(&span, response, failure, tags);
    }

    /// Start an outbound call: the client leg of the lifecycle.
    ///
    /// Without an active span in the context this is a no-op returning
    /// `None`: an uninstrumented caller path produces no client span and
    /// nothing is injected. Otherwise the new `SpanKind::Client` span is
    /// parented to the active span and, when a carrier writer is supplied,
    /// its context is injected so the downstream peer can continue the
    /// trace.
    pub fn send_request<R: ?Sized>(
        &self,
        cx: &ExecutionContext,
        request: &R,
        operation: &str,
        carrier: Option<&mut dyn Injector>,
        tags: &dyn TagExtractor<R>,
    ) -> Option<Span> {
        self.send_request_with_kind(cx, request, operation, SpanKind::Client, carrier, tags)
    }

    /// [`send_request`](Self::send_request) with an explicit span kind, for
    /// messaging hosts that record the send leg as `SpanKind::Producer`.
    pub fn send_request_with_kind<R: ?Sized>(
        &self,
        cx: &ExecutionContext,
        request: &R,
        operation: &str,
        kind: SpanKind,
        carrier: Option<&mut dyn Injector>,
        tags: &dyn TagExtractor<R>,
    ) -> Option<Span> {
        let parent = *cx.active_span()?.span_context();

        let span = self
            .tracer
            .start_span(operation.to_owned(), kind, Some(&parent));
        span.set_attribute(KeyValue::new(semconv::COMPONENT, self.component.clone()));
        self.copy_tags(&span, request, tags);

        if let Some(injector) = carrier {
            self.propagator.inject(span.span_context(), injector);
        }

        Some(span)
    }

    /// Finalize the client leg created by [`send_request`](Self::send_request),
    /// with the same failure, functional-error and attribute rules as
    /// [`send_response`](Self::send_response). Does not touch the context's
    /// active-span slot.
    pub fn receive_response<R, E>(
        &self,
        _cx: &mut ExecutionContext,
        response: Option<&R>,
        span: Option<Span>,
        failure: Option<&E>,
        tags: &dyn TagExtractor<R>,
    ) where
        R: ResponseStatus + ?Sized,
        E: std::error::Error + ?Sized,
    {
        let Some(span) = span else { return };
        self.finish_span(&span, response, failure, tags);
    }

    /// Release the bridge.
    ///
    /// When the bridge built its own tracer it owns the pipeline: any span
    /// still open in the given context is ended and every exporter sink is
    /// shut down. With an externally supplied tracer this is a no-op;
    /// ownership stays with whoever built it.
    pub fn shutdown(&self, cx: &mut ExecutionContext) {
        if !self.owns_tracer {
            return;
        }
        if let Some(span) = cx.clear_active_span() {
            span.end();
        }
        self.tracer.shutdown();
    }

    fn finish_span<R, E>(
        &self,
        span: &Span,
        response: Option<&R>,
        failure: Option<&E>,
        tags: &dyn TagExtractor<R>,
    ) where
        R: ResponseStatus + ?Sized,
        E: std::error::Error + ?Sized,
    {
        if let Some(failure) = failure {
            report_error(span, std::any::type_name::<E>(), &failure.to_string());
        }

        if let Some(response) = response {
            if response.is_error() {
                report_error(span, semconv::FUNCTIONAL_ERROR_KIND, &response.status_text());
            }
            self.copy_tags(span, response, tags);
        }

        span.end();
    }

    fn copy_tags<R: ?Sized>(&self, span: &Span, obj: &R, tags: &dyn TagExtractor<R>) {
        for index in 0..tags.len(obj) {
            span.set_attribute(KeyValue::new(tags.name(obj, index), tags.value(obj, index)));
        }
    }
}

/// Record an error event on the span and mark the span as failed.
///
/// The event carries the fixed `event = "error"` discriminator, the error
/// kind and the message. Every call also sets the boolean `error` attribute
/// and an error status, however many error events the span accumulates.
fn report_error(span: &Span, error_kind: &str, message: &str) {
    span.add_event(
        semconv::ERROR_EVENT,
        vec![
            KeyValue::new(semconv::EVENT, semconv::ERROR_EVENT),
            KeyValue::new(semconv::ERROR_KIND, error_kind.to_owned()),
            KeyValue::new(semconv::MESSAGE, message.to_owned()),
        ],
    );
    span.set_attribute(KeyValue::new(semconv::ERROR, true));
    span.set_status(Status::error(message.to_owned()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_only_500_is_functional() {
        for (code, expected) in [(200, false), (404, false), (500, true), (503, false)] {
            let status = HttpResponseStatus {
                status_code: code,
                status_message: "whatever".to_owned(),
            };
            assert_eq!(status.is_error(), expected, "status code {code}");
        }
    }

    #[test]
    fn empty_tags_yield_nothing() {
        let tags = EmptyTags;
        assert_eq!(TagExtractor::<str>::len(&tags, "anything"), 0);
    }
}
