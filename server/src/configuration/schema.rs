use crate::configuration::ApplicationProfile;
use anyhow::Context;
use app::configuration::AppConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use guestbook_http::server::IncomingStream;
use std::net::SocketAddr;

#[derive(serde::Deserialize, Debug, Clone)]
/// Everything the guestbook server reads from `server/configuration/*.yml`
/// and from `APP_*` environment variables.
///
/// The guestbook settings ([`AppConfig`]) are flattened at the top level,
/// next to the `server` section that only the entrypoint uses.
pub struct Config {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub app: AppConfig,
}

impl Config {
    /// Assemble the configuration for the active [`ApplicationProfile`].
    ///
    /// The profile comes from `APP_PROFILE`, falling back to `default_profile`.
    /// Later sources override earlier ones:
    ///
    /// 1. `base.yml`, shared by every profile;
    /// 2. `<profile>.yml`, e.g. `prod.yml`;
    /// 3. environment variables prefixed with `APP_`, where `__` separates
    ///    nested fields.
    ///
    /// `APP_SERVER__PORT=9000` overrides [`ServerConfig::port`], while
    /// `APP_GUESTBOOK__VARIANT=comments` switches the guestbook variant.
    pub fn load(default_profile: Option<ApplicationProfile>) -> Result<Config, anyhow::Error> {
        let application_profile = ApplicationProfile::load(default_profile)
            .context("Failed to load the desired application profile")?;

        let configuration_dir = {
            let manifest_dir = env!(
                "CARGO_MANIFEST_DIR",
                "`CARGO_MANIFEST_DIR` was not set. Are you using a custom build system?"
            );
            std::path::Path::new(manifest_dir).join("configuration")
        };

        let base_filepath = configuration_dir.join("base.yml");

        let profile_filename = format!("{}.yml", application_profile.as_str());
        let profile_filepath = configuration_dir.join(profile_filename);

        let figment = Figment::new()
            .merge(Yaml::file(base_filepath))
            .merge(Yaml::file(profile_filepath))
            .merge(Env::prefixed("APP_").split("__"));

        let configuration: Config = figment
            .extract()
            .context("Failed to load hierarchical configuration")?;
        Ok(configuration)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
/// Configuration for the HTTP server used to expose the guestbook.
pub struct ServerConfig {
    /// The port that the server must listen on.
    ///
    /// Set the `APP_SERVER__PORT` environment variable to override its value.
    #[serde(deserialize_with = "serde_aux::field_attributes::deserialize_number_from_string")]
    pub port: u16,
    /// The network interface that the server must be bound to.
    ///
    /// E.g. `0.0.0.0` for listening to incoming requests from
    /// all sources.
    ///
    /// Set the `APP_SERVER__IP` environment variable to override its value.
    pub ip: std::net::IpAddr,
    /// The timeout for graceful shutdown of the server.
    ///
    /// E.g. `1 minute` for a 1 minute timeout.
    ///
    /// Set the `APP_SERVER__GRACEFUL_SHUTDOWN_TIMEOUT` environment variable to override its value.
    #[serde(with = "humantime_serde")]
    pub graceful_shutdown_timeout: std::time::Duration,
}

impl ServerConfig {
    /// Bind a TCP listener according to the specified parameters.
    pub async fn listener(&self) -> Result<IncomingStream, std::io::Error> {
        let addr = SocketAddr::new(self.ip, self.port);
        IncomingStream::bind(addr).await
    }
}
