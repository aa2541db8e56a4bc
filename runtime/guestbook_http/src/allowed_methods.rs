//! The HTTP methods accepted by a route path.
use http::header::ALLOW;
use http::{HeaderValue, Method, StatusCode};

use crate::response::{self, Response};

#[derive(Debug, Clone, PartialEq, Eq)]
/// The set of HTTP methods that can be used to invoke a route path.
///
/// It is used to set the `Allow` header when returning a
/// `405 Method Not Allowed` response.
pub struct MethodAllowList {
    methods: Vec<Method>,
}

impl MethodAllowList {
    /// Create a new allow list from the given methods.
    pub fn from_iter(iter: impl IntoIterator<Item = Method>) -> Self {
        Self {
            methods: iter.into_iter().collect(),
        }
    }

    /// Check if `method` is part of the allow list.
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// The value that should be set for the `Allow` header
    /// in a `405 Method Not Allowed` response for this route path.
    ///
    /// It returns `None` if there are no allowed methods.
    /// It returns the comma-separated list of allowed methods otherwise.
    pub fn allow_header_value(&self) -> Option<HeaderValue> {
        if self.methods.is_empty() {
            return None;
        }
        let allow_header = self
            .methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(",");
        HeaderValue::from_str(&allow_header).ok()
    }
}

/// The response to send back when a request path matches a route but its method doesn't.
///
/// It returns a `405 Method Not Allowed` response with the `Allow` header
/// populated from `allowed_methods`.
pub fn method_not_allowed(allowed_methods: &MethodAllowList) -> Response {
    let mut response = response::empty(StatusCode::METHOD_NOT_ALLOWED);
    if let Some(allow) = allowed_methods.allow_header_value() {
        response.headers_mut().insert(ALLOW, allow);
    }
    response
}
