//! Exporter sinks for finished spans.
//!
//! Every sink registered with a tracer receives every finished span.
//! Registration order determines fan-out order but carries no semantic
//! weight; a failing sink is isolated from the others by the tracer.

use crate::trace::SpanData;
use std::fmt;

pub mod in_memory;
pub mod logging;

pub use in_memory::InMemorySpanExporter;
pub use logging::LoggingSpanExporter;

/// Describes the result of an export.
pub type ExportResult = Result<(), crate::error::ExportError>;

/// Interface that backend-specific exporters implement so they can be
/// registered as sinks for finished spans.
///
/// The exporter is expected to be primarily an encoder and transmitter of
/// the span it is handed; it must not block the caller beyond submission.
/// Any batching, retry or transport policy belongs inside the exporter.
pub trait SpanExporter: Send + Sync + fmt::Debug {
    /// Export a finished span.
    fn export(&self, span: &SpanData) -> ExportResult;

    /// Shut down the exporter, releasing any resources it holds.
    ///
    /// Called once when the owning bridge shuts down. Subsequent `export`
    /// calls may be rejected with [`ExportError::AlreadyShutdown`].
    ///
    /// [`ExportError::AlreadyShutdown`]: crate::error::ExportError::AlreadyShutdown
    fn shutdown(&self) {}
}
