//! In-process trace model: ids, span handles and the span factory.

pub mod id_generator;
pub mod span;
pub mod span_context;
pub mod tracer;

pub use id_generator::{IdGenerator, RandomIdGenerator};
pub use span::{Event, Span, SpanData, SpanKind, Status};
pub use span_context::{SpanContext, SpanId, TraceFlags, TraceId};
pub use tracer::Tracer;

#[cfg(any(test, feature = "testing"))]
pub use id_generator::IncrementIdGenerator;
