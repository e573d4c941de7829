//! Well-known attribute and event names used across the bridge boundary.

/// Attribute identifying the instrumentation layer that produced a span.
pub const COMPONENT: &str = "component";

/// Boolean attribute set on a span once any error has been recorded on it.
pub const ERROR: &str = "error";

/// Name of the event recorded for errors, and the value of its
/// [`EVENT`] discriminator attribute.
pub const ERROR_EVENT: &str = "error";

/// Event attribute discriminating the event type.
pub const EVENT: &str = "event";

/// Event attribute carrying the error classification.
pub const ERROR_KIND: &str = "error.kind";

/// Event attribute carrying the human-readable error message.
pub const MESSAGE: &str = "message";

/// Error kind recorded for protocol-level functional errors, as opposed to
/// transport or operation failures.
pub const FUNCTIONAL_ERROR_KIND: &str = "Functional";

/// Resource attribute naming the service that produced a span.
pub const SERVICE_NAME: &str = "service.name";

/// Attribute naming the remote peer a messaging operation addressed.
///
/// Supplied by host tag extractors, not set by the bridge itself.
pub const PEER_SERVICE: &str = "peer.service";

/// HTTP request method attribute, supplied by host tag extractors.
pub const HTTP_METHOD: &str = "http.method";

/// HTTP request URL attribute, supplied by host tag extractors.
pub const HTTP_URL: &str = "http.url";

/// HTTP response status code attribute, supplied by host tag extractors.
pub const HTTP_STATUS_CODE: &str = "http.status_code";
