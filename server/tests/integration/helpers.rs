use app::{ApplicationState, ServerState, run};
use guestbook_http::server::{Server, ServerHandle, ShutdownMode};
use server::configuration::{ApplicationProfile, Config};
use std::sync::Once;
use std::time::Duration;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

pub struct TestApi {
    pub api_address: String,
    pub api_client: reqwest::Client,
    server_handle: ServerHandle,
    application_state: ApplicationState,
}

impl TestApi {
    /// Spawn the server using the test configuration.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn the server after tweaking the test configuration with `customize`.
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> Self {
        Self::init_telemetry();
        let mut config = Self::get_config();
        customize(&mut config);

        let application_state = ApplicationState::new(&config.app)
            .await
            .expect("Failed to build the application state");
        let server_state = ServerState::new(application_state.clone())
            .expect("Failed to build the server state");

        let tcp_listener = config
            .server
            .listener()
            .await
            .expect("Failed to bind the server TCP listener");
        let address = tcp_listener
            .local_addr()
            .expect("The server TCP listener doesn't have a local socket address");
        let server_handle = run(Server::new().listen(tcp_listener), server_state);

        TestApi {
            api_address: format!("http://{}:{}", config.server.ip, address.port()),
            api_client: reqwest::Client::new(),
            server_handle,
            application_state,
        }
    }

    /// The state shared with the running server, for direct inspection of stored entries.
    pub fn application_state(&self) -> &ApplicationState {
        &self.application_state
    }

    /// Shut the server down gracefully and release the application resources.
    pub async fn shutdown(self) {
        self.server_handle
            .shutdown(ShutdownMode::Graceful {
                timeout: Duration::from_secs(5),
            })
            .await;
        self.application_state.teardown().await;
    }

    /// Load the test configuration and tweak it to ensure that tests are
    /// properly isolated from each other.
    fn get_config() -> Config {
        let mut config = Config::load(Some(ApplicationProfile::Test))
            .expect("Failed to load test configuration");
        // We use port `0` to get the operating system to assign us a random port.
        // This lets us run tests in parallel without running into "port X is already in use"
        // errors.
        config.server.port = 0;
        config
    }

    fn init_telemetry() {
        // Initialize the telemetry setup at most once.
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")),
                    )
                    .finish();
                // We don't redirect panic messages to the `tracing` subsystem because
                // we want to see them in the test output.
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }
}

/// Convenient methods for calling the API under test.
impl TestApi {
    pub async fn get_ping(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/ping", &self.api_address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_guestbook(&self, query: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .get(format!("{}/", &self.api_address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_guestbook_html(&self, query: &[(&str, &str)]) -> String {
        let response = self.get_guestbook(query).await;
        assert_eq!(response.status().as_u16(), 200);
        response.text().await.expect("Failed to read the body")
    }

    pub async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.api_client
            .request(method, format!("{}{}", &self.api_address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// The `<li>` items of the guestbook page, in display order.
pub fn list_items(html: &str) -> Vec<&str> {
    html.split("<li>")
        .skip(1)
        .filter_map(|item| item.split("</li>").next())
        .collect()
}
