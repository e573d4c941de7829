//! A tracing bridge for networked applications.
//!
//! `tracebridge` observes the inbound/outbound request boundaries of a host
//! framework and turns them into distributed-trace spans, exported to any
//! number of registered sinks. It takes care of the parts that are easy to
//! get silently wrong: decoding and injecting W3C `traceparent` carriers,
//! parenting spans correctly across server, client and messaging
//! boundaries, attaching request/response attributes and error events, and
//! tying span lifetime to a per-request execution context.
//!
//! The host's request and response objects stay opaque: the bridge reads
//! their attributes through the [`TagExtractor`] capability and probes
//! responses for backend errors through [`ResponseStatus`]. Export backends
//! plug in behind [`export::SpanExporter`].
//!
//! # Example
//!
//! ```
//! use tracebridge::{
//!     BridgeConfig, EmptyTags, ExecutionContext, HttpResponseStatus, InMemorySpanExporter,
//! };
//!
//! let exporter = InMemorySpanExporter::new();
//! let mut config = BridgeConfig::new("frontend");
//! config.exporters.push(Box::new(exporter.clone()));
//! let bridge = config.build().unwrap().expect("tracing is enabled");
//!
//! // Inbound request arrives; headers form the carrier.
//! let mut cx = ExecutionContext::new();
//! let headers: Vec<(String, String)> = Vec::new();
//! let span = bridge.receive_request(&mut cx, &(), "GET", &headers, &EmptyTags);
//!
//! // ... request processing ...
//!
//! let response = HttpResponseStatus {
//!     status_code: 200,
//!     status_message: "OK".to_owned(),
//! };
//! bridge.send_response(
//!     &mut cx,
//!     Some(&response),
//!     Some(span),
//!     None::<&std::io::Error>,
//!     &EmptyTags,
//! );
//!
//! assert_eq!(exporter.finished_spans().unwrap().len(), 1);
//! ```
//!
//! # Error handling
//!
//! No lifecycle operation ever raises an error to the host: malformed
//! carriers decode to fresh roots, operation failures and backend errors
//! are absorbed into span state, and exporter failures are isolated per
//! sink. A broken trace is acceptable; a broken request is not.

#![deny(missing_docs)]

pub mod bridge;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod propagation;
pub mod semconv;
pub mod trace;

mod common;

pub use bridge::{
    EmptyTags, HttpResponseStatus, NoResponseStatus, ResponseStatus, TagExtractor, TraceBridge,
};
pub use common::{Key, KeyValue, Value};
pub use config::BridgeConfig;
pub use context::ExecutionContext;
pub use export::{InMemorySpanExporter, LoggingSpanExporter, SpanExporter};
pub use trace::{Span, SpanContext, SpanData, SpanId, SpanKind, Status, TraceId, Tracer};
