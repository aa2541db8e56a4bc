//! A guestbook web page backed by an ordered key-value store.
//!
//! Visitors submit a `title`/`content` pair through the query string of `GET /`.
//! The submission is persisted and the page re-renders every stored entry.
//!
//! Check out [`guestbook::Guestbook`] for the storage model and
//! [`route_request`] for the HTTP surface.
pub mod configuration;
pub mod guestbook;
pub mod query;
pub mod render;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use router::{ServerState, route_request, run};
pub use state::{ApplicationState, ApplicationStateError};
