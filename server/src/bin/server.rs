use anyhow::Context;
use app::{ApplicationState, ServerState, run};
use guestbook_http::server::{Server, ShutdownMode};
use server::{
    configuration::Config,
    telemetry::{get_subscriber, init_telemetry},
};
use tracing_log_error::fields::{ERROR_DETAILS, ERROR_MESSAGE, error_details, error_message};
use tracing_log_error::log_error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("info".into(), std::io::stdout);
    init_telemetry(subscriber)?;

    // All the setup and launch logic lives in `_main`, so that there is
    // a single choke point where fatal errors get logged.
    if let Err(e) = _main().await {
        tracing::event!(
            tracing::Level::ERROR,
            { ERROR_MESSAGE } = error_message(&e),
            { ERROR_DETAILS } = error_details(&e),
            "The application is exiting due to an error"
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn _main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if it exists.
    let _ = dotenvy::dotenv();

    let config = Config::load(None)?;
    let application_state = ApplicationState::new(&config.app)
        .await
        .context("Failed to build the application state")?;
    let server_state = ServerState::new(application_state.clone())
        .context("Failed to build the server state")?;

    let tcp_listener = config
        .server
        .listener()
        .await
        .context("Failed to bind the server TCP listener")?;
    let address = tcp_listener
        .local_addr()
        .context("The server TCP listener doesn't have a local socket address")?;
    let server_builder = Server::new().listen(tcp_listener);

    tracing::info!("Starting to listen for incoming requests at {}", address);
    let server_handle = run(server_builder, server_state);

    let shutdown_handle = server_handle.clone();
    let timeout = config.server.graceful_shutdown_timeout;
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error!(e, "Failed to listen for the shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, draining in-flight requests");
        shutdown_handle
            .shutdown(ShutdownMode::Graceful { timeout })
            .await;
    });

    server_handle.await;
    application_state.teardown().await;
    tracing::info!("The server has stopped");
    Ok(())
}
