//! Build outgoing HTTP responses.
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use http_body_util::Full;
use mime::{TEXT_HTML_UTF_8, TEXT_PLAIN_UTF_8};

/// The response type returned by request handlers.
///
/// Bodies are fully buffered in memory.
pub type Response = http::Response<Full<Bytes>>;

/// A response with the given status code and an empty body.
pub fn empty(status: StatusCode) -> Response {
    let mut response = http::Response::new(Full::default());
    *response.status_mut() = status;
    response
}

/// A `200 OK` response with an HTML body.
///
/// The `Content-Type` header is set to `text/html; charset=utf-8`.
pub fn html<B: Into<Bytes>>(body: B) -> Response {
    with_body(StatusCode::OK, body.into(), TEXT_HTML_UTF_8.as_ref())
}

/// A response with the given status code and a plain text body.
///
/// The `Content-Type` header is set to `text/plain; charset=utf-8`.
pub fn text<B: Into<Bytes>>(status: StatusCode, body: B) -> Response {
    with_body(status, body.into(), TEXT_PLAIN_UTF_8.as_ref())
}

fn with_body(status: StatusCode, body: Bytes, content_type: &'static str) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn html_responses_carry_the_html_content_type() {
        let response = super::html("<p>hi</p>");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<p>hi</p>");
    }

    #[test]
    fn empty_responses_have_no_content_type() {
        let response = super::empty(StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn text_responses_keep_their_status() {
        let response = super::text(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
