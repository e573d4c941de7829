//! Bridge configuration.

use crate::bridge::TraceBridge;
use crate::error::ConfigError;
use crate::export::SpanExporter;
use crate::trace::Tracer;
use std::borrow::Cow;

/// Configuration for a [`TraceBridge`].
///
/// A plain struct with public fields: construct it, adjust what you need,
/// then call [`build`](Self::build). Validation happens at build time, not
/// field by field.
///
/// ```
/// use tracebridge::{BridgeConfig, InMemorySpanExporter};
///
/// let exporter = InMemorySpanExporter::new();
/// let mut config = BridgeConfig::new("checkout");
/// config.exporters.push(Box::new(exporter.clone()));
/// let bridge = config.build().unwrap().expect("bridge is enabled");
/// # drop(bridge);
/// ```
#[derive(Debug)]
pub struct BridgeConfig {
    /// Whether tracing is enabled at all. A disabled config builds no bridge.
    pub enabled: bool,
    /// Required when the bridge builds its own tracer; stamped on every
    /// finished span as the `service.name` attribute.
    pub service_name: String,
    /// Value of the `component` attribute identifying the instrumented
    /// framework on every span the bridge creates.
    pub component: Cow<'static, str>,
    /// Exporter sinks to register; all of them receive every finished span.
    pub exporters: Vec<Box<dyn SpanExporter>>,
    /// Externally supplied tracer. When set, the bridge reuses it as-is:
    /// it does not own its shutdown, and `service_name`/`exporters` are not
    /// consulted because the tracer already carries its own.
    pub tracer: Option<Tracer>,
}

/// Default value of [`BridgeConfig::component`].
pub const DEFAULT_COMPONENT: &str = "tracebridge";

impl BridgeConfig {
    /// A config that will build its own tracer for the given service.
    pub fn new(service_name: impl Into<String>) -> Self {
        BridgeConfig {
            enabled: true,
            service_name: service_name.into(),
            component: Cow::Borrowed(DEFAULT_COMPONENT),
            exporters: Vec::new(),
            tracer: None,
        }
    }

    /// A config that reuses an externally built tracer.
    ///
    /// The resulting bridge does not own the tracer's shutdown.
    pub fn with_tracer(tracer: Tracer) -> Self {
        BridgeConfig {
            enabled: true,
            service_name: String::new(),
            component: Cow::Borrowed(DEFAULT_COMPONENT),
            exporters: Vec::new(),
            tracer: Some(tracer),
        }
    }

    /// Validate the configuration and build the bridge.
    ///
    /// Returns `Ok(None)` when tracing is disabled, and
    /// [`ConfigError::MissingServiceName`] when the bridge would have to
    /// build its own tracer without a service name.
    pub fn build(self) -> Result<Option<TraceBridge>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }

        let (tracer, owns_tracer) = match self.tracer {
            Some(tracer) => (tracer, false),
            None => {
                if self.service_name.trim().is_empty() {
                    return Err(ConfigError::MissingServiceName);
                }
                (Tracer::new(self.service_name, self.exporters), true)
            }
        };

        Ok(Some(TraceBridge::new(tracer, owns_tracer, self.component)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_builds_no_bridge() {
        let mut config = BridgeConfig::new("svc");
        config.enabled = false;
        assert!(config.build().unwrap().is_none());
    }

    #[test]
    fn missing_service_name_is_rejected() {
        let config = BridgeConfig::new("  ");
        assert_eq!(
            config.build().unwrap_err(),
            ConfigError::MissingServiceName
        );
    }

    #[test]
    fn external_tracer_needs_no_service_name() {
        let tracer = Tracer::new("external", Vec::new());
        let config = BridgeConfig::with_tracer(tracer);
        assert!(config.build().unwrap().is_some());
    }

    #[test]
    fn own_tracer_carries_the_service_name() {
        let bridge = BridgeConfig::new("checkout").build().unwrap().unwrap();
        assert_eq!(bridge.tracer().service_name(), "checkout");
    }
}
