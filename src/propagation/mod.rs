//! Carrier interfaces for moving trace context across process boundaries.
//!
//! Propagators read and write context data through the [`Extractor`] and
//! [`Injector`] traits so the codec stays independent of the host's header
//! representation. Carriers may be real maps or plain ordered lists of
//! key/value pairs; the list implementations use a linear scan by key
//! equality and assume no fast-lookup structure.

use std::collections::HashMap;

pub mod trace_context;

pub use trace_context::TraceContextPropagator;

/// Injector provides an interface for adding fields to an outbound carrier.
pub trait Injector {
    /// Add a key and value to the underlying data.
    fn set(&mut self, key: &str, value: String);
}

/// Extractor provides an interface for reading fields from an inbound carrier.
pub trait Extractor {
    /// Get a value for a key from the underlying data.
    fn get(&self, key: &str) -> Option<&str>;

    /// Collect all the keys from the underlying data.
    fn keys(&self) -> Vec<&str>;
}

impl<S: std::hash::BuildHasher> Injector for HashMap<String, String, S> {
    /// Set a key and value in the HashMap. Keys are stored lowercase.
    fn set(&mut self, key: &str, value: String) {
        self.insert(key.to_lowercase(), value);
    }
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    /// Get a value for a key from the HashMap, ignoring key case.
    fn get(&self, key: &str) -> Option<&str> {
        self.get(&key.to_lowercase()).map(|v| v.as_str())
    }

    fn keys(&self) -> Vec<&str> {
        self.keys().map(|k| k.as_str()).collect()
    }
}

impl Extractor for [(String, String)] {
    /// Linear scan for the first pair whose key matches exactly.
    fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn keys(&self) -> Vec<&str> {
        self.iter().map(|(k, _)| k.as_str()).collect()
    }
}

impl Extractor for Vec<(String, String)> {
    fn get(&self, key: &str) -> Option<&str> {
        Extractor::get(self.as_slice(), key)
    }

    fn keys(&self) -> Vec<&str> {
        Extractor::keys(self.as_slice())
    }
}

impl Injector for Vec<(String, String)> {
    /// Replaces an existing entry for the key rather than duplicating it.
    fn set(&mut self, key: &str, value: String) {
        match self.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.push((key.to_string(), value)),
        }
    }
}
