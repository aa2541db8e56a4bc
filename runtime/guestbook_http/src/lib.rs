//! The HTTP runtime for the guestbook.
//!
//! It is deliberately small: a [`Server`](server::Server) that accepts connections and hands
//! every request to a single handler function, plus a few helpers to assemble
//! [`Response`](response::Response)s.
pub mod allowed_methods;
pub mod response;
pub mod server;
