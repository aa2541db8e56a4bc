use crate::guestbook::{GuestbookError, GuestbookQuery, Submission};
use crate::query;
use crate::render;
use crate::state::ApplicationState;
use guestbook_http::response::{self, Response};
use http::StatusCode;
use jiff::Timestamp;
use tracing_log_error::log_error;

/// Record the submission carried by the query string, then render every guestbook entry.
///
/// Query parameters are never rejected: whatever can't be parsed falls back to the defaults.
pub async fn get(
    query: Option<&str>,
    state: &ApplicationState,
) -> Result<Response, GuestbookPageError> {
    let params: GuestbookQuery = query::extract(query).unwrap_or_else(|e| {
        log_error!(e, level: tracing::Level::WARN, "Ignoring unparseable query parameters");
        GuestbookQuery::default()
    });
    let submission = Submission::from_query(params);
    state
        .guestbook
        .record(&submission, Timestamp::now())
        .await?;
    let entries = state.guestbook.entries().await?;
    Ok(response::html(render::page(&entries, &state.time_zone)))
}

#[derive(Debug, thiserror::Error)]
/// The ways in which serving the guestbook page can fail.
pub enum GuestbookPageError {
    #[error(transparent)]
    Guestbook(#[from] GuestbookError),
}

impl GuestbookPageError {
    /// Convert the error into an HTTP response.
    ///
    /// Store failures are reported with a generic `500 Internal Server Error`:
    /// details only end up in the logs.
    pub fn into_response(&self) -> Response {
        match self {
            Self::Guestbook(_) => response::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong. Please try again later.",
            ),
        }
    }
}
