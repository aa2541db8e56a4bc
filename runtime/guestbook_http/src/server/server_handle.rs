use std::convert::Infallible;
use std::future::{Future, IntoFuture, poll_fn};
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::Poll;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};

use crate::response::Response;

use super::{IncomingStream, ShutdownMode};

/// A handle to a running [`Server`](super::Server).
///
/// You can use it to shut the server down, via [`ServerHandle::shutdown`].
/// Or you can `.await` it to wait until the server has stopped.
///
/// The handle is cheap to clone: all clones control the same server.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    command_outbox: mpsc::Sender<ServerCommand>,
}

impl ServerHandle {
    pub(super) fn new<HandlerFuture, ApplicationState>(
        incoming: Vec<IncomingStream>,
        handler: fn(http::Request<hyper::body::Incoming>, ApplicationState) -> HandlerFuture,
        application_state: ApplicationState,
    ) -> Self
    where
        HandlerFuture: Future<Output = Response> + Send + 'static,
        ApplicationState: Clone + Send + Sync + 'static,
    {
        let (command_outbox, command_inbox) = mpsc::channel(32);
        let acceptor = Acceptor::new(incoming, handler, application_state, command_inbox);
        tokio::spawn(acceptor.run());
        Self { command_outbox }
    }

    /// Instruct the server to stop accepting new connections, then wait until
    /// in-flight connections are either completed or dropped, according to `mode`.
    ///
    /// It resolves once the server has fully stopped.
    /// If the server has already stopped, it resolves immediately.
    #[doc(alias("stop"))]
    pub async fn shutdown(self, mode: ShutdownMode) {
        let (completion_notifier, completion) = oneshot::channel();
        if self
            .command_outbox
            .send(ServerCommand::Shutdown {
                completion_notifier,
                mode,
            })
            .await
            .is_ok()
        {
            let _ = completion.await;
        }
    }
}

impl IntoFuture for ServerHandle {
    type Output = ();
    type IntoFuture = Pin<Box<dyn Future<Output = ()> + Send + Sync + 'static>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.command_outbox.closed().await })
    }
}

#[derive(Debug)]
enum ServerCommand {
    Shutdown {
        completion_notifier: oneshot::Sender<()>,
        mode: ShutdownMode,
    },
}

#[must_use]
struct Acceptor<HandlerFuture, ApplicationState> {
    command_inbox: mpsc::Receiver<ServerCommand>,
    incoming: Vec<IncomingStream>,
    handler: fn(http::Request<hyper::body::Incoming>, ApplicationState) -> HandlerFuture,
    application_state: ApplicationState,
    // `fn() -> HandlerFuture` keeps `Acceptor` `Send` and `Sync` regardless of `HandlerFuture`.
    handler_output_future: PhantomData<fn() -> HandlerFuture>,
}

enum AcceptorInboxMessage {
    ServerCommand(ServerCommand),
    Connection(Option<Result<(IncomingStream, TcpStream, SocketAddr), JoinError>>),
}

impl<HandlerFuture, ApplicationState> Acceptor<HandlerFuture, ApplicationState>
where
    HandlerFuture: Future<Output = Response> + Send + 'static,
    ApplicationState: Clone + Send + Sync + 'static,
{
    fn new(
        incoming: Vec<IncomingStream>,
        handler: fn(http::Request<hyper::body::Incoming>, ApplicationState) -> HandlerFuture,
        application_state: ApplicationState,
        command_inbox: mpsc::Receiver<ServerCommand>,
    ) -> Self {
        Self {
            command_inbox,
            incoming,
            handler,
            application_state,
            handler_output_future: PhantomData,
        }
    }

    async fn run(self) {
        async fn accept_connection(
            incoming: IncomingStream,
        ) -> (IncomingStream, TcpStream, SocketAddr) {
            loop {
                match incoming.accept().await {
                    Ok((connection, remote_peer)) => return (incoming, connection, remote_peer),
                    Err(e) => {
                        tracing::error!(
                            error.msg = %e,
                            error.details = ?e,
                            "Failed to accept connection"
                        );
                        continue;
                    }
                }
            }
        }

        let Self {
            mut command_inbox,
            incoming,
            handler,
            application_state,
            handler_output_future: _,
        } = self;

        let mut incoming_join_set = JoinSet::new();
        for incoming in incoming.into_iter() {
            incoming_join_set.spawn(accept_connection(incoming));
        }
        if incoming_join_set.is_empty() {
            tracing::warn!("The server is not listening on any address");
        }

        let connection_builder = auto::Builder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        let mut connections = JoinSet::new();

        let error = 'event_loop: loop {
            let message =
                poll_fn(|cx| Self::poll_inboxes(cx, &mut command_inbox, &mut incoming_join_set))
                    .await;
            match message {
                AcceptorInboxMessage::ServerCommand(command) => match command {
                    ServerCommand::Shutdown {
                        completion_notifier,
                        mode,
                    } => {
                        Self::shutdown(
                            completion_notifier,
                            mode,
                            incoming_join_set,
                            graceful,
                            connections,
                        )
                        .await;
                        return;
                    }
                },
                AcceptorInboxMessage::Connection(msg) => {
                    let (incoming, connection, remote_peer) = match msg {
                        Some(Ok((incoming, connection, remote_peer))) => {
                            (incoming, connection, remote_peer)
                        }
                        Some(Err(e)) => {
                            // Only happens if an accept task panicked or got cancelled.
                            break 'event_loop e;
                        }
                        None => {
                            // Every accepted connection re-spawns its accept task and
                            // an empty `JoinSet` is never polled.
                            unreachable!(
                                "The JoinSet for incoming connections cannot ever be empty"
                            )
                        }
                    };
                    // Re-spawn the task to keep accepting connections from the same socket.
                    incoming_join_set.spawn(accept_connection(incoming));

                    // Reap the connections that have already been closed.
                    while connections.try_join_next().is_some() {}

                    let state = application_state.clone();
                    let service = hyper::service::service_fn(
                        move |request: http::Request<hyper::body::Incoming>| {
                            let response = handler(request, state.clone());
                            async move { Ok::<_, Infallible>(response.await) }
                        },
                    );
                    let connection = connection_builder
                        .serve_connection_with_upgrades(TokioIo::new(connection), service)
                        .into_owned();
                    let connection = graceful.watch(connection);
                    connections.spawn(async move {
                        if let Err(e) = connection.await {
                            tracing::debug!(
                                remote_peer = %remote_peer,
                                error.msg = %e,
                                error.details = ?e,
                                "Failed to serve connection"
                            );
                        }
                    });
                }
            }
        };

        tracing::error!(
            error.msg = %error,
            error.details = ?error,
            "Failed to accept new connections. The acceptor will exit now."
        );
    }

    fn poll_inboxes(
        cx: &mut std::task::Context<'_>,
        server_command_inbox: &mut mpsc::Receiver<ServerCommand>,
        incoming_join_set: &mut JoinSet<(IncomingStream, TcpStream, SocketAddr)>,
    ) -> Poll<AcceptorInboxMessage> {
        // Shutdown commands take priority over incoming connections.
        if let Poll::Ready(Some(message)) = server_command_inbox.poll_recv(cx) {
            return Poll::Ready(AcceptorInboxMessage::ServerCommand(message));
        }
        if !incoming_join_set.is_empty() {
            if let Poll::Ready(message) = incoming_join_set.poll_join_next(cx) {
                return Poll::Ready(AcceptorInboxMessage::Connection(message));
            }
        }
        Poll::Pending
    }

    async fn shutdown(
        completion_notifier: oneshot::Sender<()>,
        mode: ShutdownMode,
        mut incoming_join_set: JoinSet<(IncomingStream, TcpStream, SocketAddr)>,
        graceful: GracefulShutdown,
        mut connections: JoinSet<()>,
    ) {
        // Cancelling the accept tasks drops the listeners, closing the sockets.
        incoming_join_set.shutdown().await;

        if let ShutdownMode::Graceful { timeout } = mode {
            if tokio::time::timeout(timeout, graceful.shutdown())
                .await
                .is_err()
            {
                tracing::warn!(
                    n_connections = connections.len(),
                    "Graceful shutdown timed out, dropping the remaining connections"
                );
            }
        }
        connections.shutdown().await;

        // Notify the caller that the server has shut down.
        let _ = completion_notifier.send(());
    }
}
