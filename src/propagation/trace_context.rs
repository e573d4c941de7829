//! # W3C Trace Context codec
//!
//! Encodes and decodes span contexts in the [W3C TraceContext] `traceparent`
//! header format:
//!
//! `traceparent: 00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`
//!
//! The four fields are version, trace-id, parent-id and trace-flags.
//! Extraction never fails: any absent or malformed header yields the empty
//! span context so the traced request proceeds as a fresh root.
//!
//! [W3C TraceContext]: https://www.w3.org/TR/trace-context/

use crate::propagation::{Extractor, Injector};
use crate::trace::span_context::{SpanContext, SpanId, TraceFlags, TraceId};

const SUPPORTED_VERSION: u8 = 0;
const MAX_VERSION: u8 = 254;

/// The header under which trace context is propagated.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Propagates [`SpanContext`]s in W3C TraceContext format.
///
/// Extract and inject are pure and stateless; a single propagator instance
/// can be shared freely between threads.
#[derive(Clone, Debug, Default)]
pub struct TraceContextPropagator {
    _private: (),
}

impl TraceContextPropagator {
    /// Create a new `TraceContextPropagator`.
    pub fn new() -> Self {
        TraceContextPropagator { _private: () }
    }

    /// The carrier keys this propagator reads and writes.
    pub fn fields(&self) -> &'static [&'static str] {
        &[TRACEPARENT_HEADER]
    }

    /// Decodes a span context from the carrier.
    ///
    /// Returns the empty context if the `traceparent` entry is absent or
    /// malformed in any way; this operation never fails.
    pub fn extract(&self, extractor: &dyn Extractor) -> SpanContext {
        self.extract_span_context(extractor)
            .unwrap_or(SpanContext::NONE)
    }

    /// Encodes the given span context into the carrier.
    ///
    /// Invalid contexts are not written. Pre-existing unrelated carrier
    /// entries are left untouched.
    pub fn inject(&self, span_context: &SpanContext, injector: &mut dyn Injector) {
        if span_context.is_valid() {
            let header_value = format!(
                "{:02x}-{}-{}-{:02x}",
                SUPPORTED_VERSION,
                span_context.trace_id(),
                span_context.span_id(),
                span_context.trace_flags() & TraceFlags::SAMPLED
            );
            injector.set(TRACEPARENT_HEADER, header_value);
        }
    }

    fn extract_span_context(&self, extractor: &dyn Extractor) -> Result<SpanContext, ()> {
        let header_value = extractor.get(TRACEPARENT_HEADER).unwrap_or("").trim();
        let parts = header_value.split_terminator('-').collect::<Vec<&str>>();
        // Ensure parts are not out of range.
        if parts.len() < 4 {
            return Err(());
        }

        // Ensure version is within range, for version 0 there must be 4 parts.
        let version = u8::from_str_radix(parts[0], 16).map_err(|_| ())?;
        if version > MAX_VERSION || version == 0 && parts.len() != 4 {
            return Err(());
        }

        // Ensure trace id is lowercase
        if parts[1].chars().any(|c| c.is_ascii_uppercase()) {
            return Err(());
        }

        let trace_id = TraceId::from_hex(parts[1]).map_err(|_| ())?;

        // Ensure span id is lowercase
        if parts[2].chars().any(|c| c.is_ascii_uppercase()) {
            return Err(());
        }

        let span_id = SpanId::from_hex(parts[2]).map_err(|_| ())?;

        let opts = u8::from_str_radix(parts[3], 16).map_err(|_| ())?;

        // Ensure opts are valid for version 0
        if version == 0 && opts > 2 {
            return Err(());
        }

        // Clear all flags other than the supported sampling bit.
        let trace_flags = TraceFlags::new(opts) & TraceFlags::SAMPLED;

        let span_context = SpanContext::new(trace_id, span_id, trace_flags, true);

        if !span_context.is_valid() {
            return Err(());
        }

        Ok(span_context)
    }
}
