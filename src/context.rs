//! Per-request execution context.

use crate::trace::Span;

/// State owned by one in-flight logical request.
///
/// The context holds at most one active span at a time. The bridge writes
/// and removes the association during its lifecycle operations; application
/// code should only read it through [`active_span`](Self::active_span).
///
/// A context instance belongs to exactly one logical unit of work. The host
/// framework must keep all lifecycle callbacks for that unit on the context
/// instance it created for it (execution-context affinity); under that
/// precondition no internal locking is needed and none is done. Independent
/// concurrent requests each get their own context and cannot observe each
/// other's slot.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    active_span: Option<Span>,
}

impl ExecutionContext {
    /// Create a context with an empty active-span slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active span, if any.
    pub fn active_span(&self) -> Option<&Span> {
        self.active_span.as_ref()
    }

    /// Associate a span with this context, replacing any previous one.
    pub fn set_active_span(&mut self, span: Span) {
        self.active_span = Some(span);
    }

    /// Remove and return the active span association, if any.
    ///
    /// An empty slot is not an error; `None` is returned.
    pub fn clear_active_span(&mut self) -> Option<Span> {
        self.active_span.take()
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        // A span still sitting in the slot at teardown was never ended and
        // its trace will be incomplete. The host owes a completion callback
        // on every exit path, including cancellation.
        if let Some(span) = &self.active_span {
            if span.is_recording() {
                tracing::debug!(
                    span_id = %span.span_context().span_id(),
                    "execution context dropped with an active span still open"
                );
            }
        }
    }
}
