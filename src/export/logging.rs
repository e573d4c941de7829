//! A span exporter that writes finished spans to the logging facade.

use crate::export::{ExportResult, SpanExporter};
use crate::trace::SpanData;

/// Emits every finished span as a `tracing` event.
///
/// Intended for development and debugging; whichever subscriber the host
/// application installs decides where the output ends up.
#[derive(Clone, Debug, Default)]
pub struct LoggingSpanExporter {
    _private: (),
}

impl LoggingSpanExporter {
    /// Create a new logging exporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpanExporter for LoggingSpanExporter {
    fn export(&self, span: &SpanData) -> ExportResult {
        tracing::info!(
            target: "tracebridge::export",
            name = %span.name,
            trace_id = %span.span_context.trace_id(),
            span_id = %span.span_context.span_id(),
            parent_span_id = %span.parent_span_id,
            kind = ?span.span_kind,
            status = ?span.status,
            "finished span"
        );
        Ok(())
    }
}
