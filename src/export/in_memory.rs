//! An in-memory span exporter, useful for testing and debugging.

use crate::error::ExportError;
use crate::export::{ExportResult, SpanExporter};
use crate::trace::SpanData;
use std::sync::{Arc, Mutex};

/// A span exporter that stores finished spans in memory.
///
/// Finished spans can be retrieved with
/// [`finished_spans`](Self::finished_spans). Clones share the same storage,
/// so a clone kept by a test observes everything the registered copy
/// received.
#[derive(Clone, Debug, Default)]
pub struct InMemorySpanExporter {
    spans: Arc<Mutex<Vec<SpanData>>>,
}

impl InMemorySpanExporter {
    /// Create a new exporter with empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished spans received so far.
    ///
    /// Fails only if the internal lock was poisoned.
    pub fn finished_spans(&self) -> Result<Vec<SpanData>, ExportError> {
        self.spans
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| ExportError::Internal(format!("failed to lock spans: {err:?}")))
    }

    /// Clears the internal storage of finished spans.
    pub fn reset(&self) {
        let _ = self.spans.lock().map(|mut guard| guard.clear());
    }
}

impl SpanExporter for InMemorySpanExporter {
    fn export(&self, span: &SpanData) -> ExportResult {
        self.spans
            .lock()
            .map(|mut guard| guard.push(span.clone()))
            .map_err(|err| ExportError::Internal(format!("failed to lock spans: {err:?}")))
    }

    fn shutdown(&self) {
        self.reset();
    }
}
