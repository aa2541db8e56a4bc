use guestbook_kv::store::errors::{ListError, SetError};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`Guestbook`](super::Guestbook) operations.
pub enum GuestbookError {
    #[error("Failed to record the guestbook submission")]
    Write(#[from] SetError),
    #[error("Failed to retrieve the guestbook entries")]
    Read(#[from] ListError),
}
