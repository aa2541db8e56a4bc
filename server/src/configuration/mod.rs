//! Refer to [`Config::load`] for more details on how configuration values are assembled.
pub use profile::ApplicationProfile;
pub use schema::{Config, ServerConfig};

mod profile;
mod schema;
