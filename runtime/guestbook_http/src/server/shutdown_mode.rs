use std::time::Duration;

/// How [`ServerHandle::shutdown`](super::ServerHandle::shutdown) treats connections
/// that are still open.
///
/// In both modes the listening sockets are closed first.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum ShutdownMode {
    /// Let in-flight requests finish, for at most `timeout`.
    /// Whatever is still open afterwards is dropped.
    Graceful { timeout: Duration },
    /// Drop every open connection right away.
    Forced,
}
