//! Request-level telemetry: the root span, plus loggers for responses and errors.
use guestbook_http::response::Response;
use http::request::Parts;
use http::{Method, Version};
use tracing::Value;
use tracing_log_error::log_error;
use uuid::Uuid;

use fields::*;

/// The root span of an incoming request.
///
/// All the spans and events emitted while handling the request are nested under it.
#[derive(Debug, Clone)]
pub struct RootSpan(tracing::Span);

impl RootSpan {
    /// Record a value for a field declared when the span was created.
    pub fn record<Q, V>(&self, field: &Q, value: V) -> &Self
    where
        Q: tracing::field::AsField + ?Sized,
        V: Value,
    {
        self.0.record(field, value);
        self
    }

    pub fn inner(&self) -> &tracing::Span {
        &self.0
    }
}

/// Construct a new root span for the given request.
pub fn root_span(request_head: &Parts, request_id: Uuid) -> RootSpan {
    // The `{ <expr> }` syntax tells `tracing` to evaluate those identifiers
    // rather than using them as literal field names.
    let span = tracing::info_span!(
        "HTTP request",
        { HTTP_REQUEST_METHOD } = http_request_method(&request_head.method),
        { HTTP_REQUEST_SERVER_ID } = tracing::field::display(request_id),
        { NETWORK_PROTOCOL_VERSION } = network_protocol_version(request_head.version),
        { URL_QUERY } = url_query(request_head),
        { URL_PATH } = request_head.uri.path(),
        { USER_AGENT_ORIGINAL } = user_agent_original(request_head),
        // Populated once the request has been routed and handled.
        // `tracing` requires every field to be declared upfront.
        { HTTP_ROUTE } = tracing::field::Empty,
        { HTTP_RESPONSE_STATUS_CODE } = tracing::field::Empty,
        { ERROR_MESSAGE } = tracing::field::Empty,
        { ERROR_DETAILS } = tracing::field::Empty,
        { ERROR_SOURCE_CHAIN } = tracing::field::Empty,
    );
    RootSpan(span)
}

/// Enrich [`RootSpan`] with information extracted from the outgoing response.
pub fn response_logger(response: &Response, root_span: &RootSpan) {
    root_span.record(HTTP_RESPONSE_STATUS_CODE, response.status().as_u16());
    tracing::info!("Request handled");
}

/// Log error details.
///
/// It emits an error event and attaches information about the error to the root span.
pub fn error_logger<E>(e: &E, root_span: &RootSpan)
where
    E: std::error::Error,
{
    log_error!(e, "An error occurred during request handling");
    root_span
        .record(ERROR_MESSAGE, error_message(e))
        .record(ERROR_DETAILS, error_details(e))
        .record(ERROR_SOURCE_CHAIN, error_source_chain(e));
}

/// The canonical representation of the request method.
///
/// Non-canonical methods are logged as `_OTHER`.
fn http_request_method(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::TRACE => "TRACE",
        Method::PATCH => "PATCH",
        Method::CONNECT => "CONNECT",
        Method::HEAD => "HEAD",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        _ => "_OTHER",
    }
}

fn network_protocol_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "_OTHER",
    }
}

fn url_query(request_head: &Parts) -> &str {
    request_head.uri.query().unwrap_or_default()
}

fn user_agent_original(request_head: &Parts) -> &str {
    request_head
        .headers
        .get(http::header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
}

pub mod fields {
    //! Field names for request logging, following
    //! [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/)
    //! whenever possible.

    // Error-related fields and the functions to populate them.
    pub use tracing_log_error::fields::*;

    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    /// The server-generated identifier for the request.
    /// It doesn't appear in OpenTelemetry's semantic convention.
    pub const HTTP_REQUEST_SERVER_ID: &str = "http.request.server_id";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    /// The path pattern matched by the incoming request.
    pub const HTTP_ROUTE: &str = "http.route";
    pub const NETWORK_PROTOCOL_VERSION: &str = "network.protocol.version";
    pub const URL_PATH: &str = "url.path";
    pub const URL_QUERY: &str = "url.query";
    pub const USER_AGENT_ORIGINAL: &str = "user_agent.original";
}
