//! Accept and serve incoming HTTP connections.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//! use guestbook_http::response::{self, Response};
//! use guestbook_http::server::{Server, ShutdownMode};
//! use http::{Request, StatusCode};
//! use hyper::body::Incoming;
//!
//! async fn handler(_request: Request<Incoming>, _state: ()) -> Response {
//!     response::empty(StatusCode::OK)
//! }
//!
//! # async fn run() -> std::io::Result<()> {
//! let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
//! let server_handle = Server::new().bind(addr).await?.serve(handler, ());
//! server_handle
//!     .shutdown(ShutdownMode::Graceful {
//!         timeout: std::time::Duration::from_secs(5),
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```
pub use incoming::IncomingStream;
pub use server::Server;
pub use server_handle::ServerHandle;
pub use shutdown_mode::ShutdownMode;

mod incoming;
mod server;
mod server_handle;
mod shutdown_mode;
