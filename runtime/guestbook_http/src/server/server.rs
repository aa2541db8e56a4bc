use std::future::Future;
use std::net::SocketAddr;

use crate::response::Response;

use super::{IncomingStream, ServerHandle};

/// An HTTP server to handle incoming connections.
///
/// # Overview
///
/// 1. Configure the [`IncomingStream`]s the server will listen on,
///    via [`Server::bind`] or [`Server::listen`].
/// 2. Start the server with [`Server::serve`].
///    It returns a [`ServerHandle`] that you can use to shut the server down.
///
/// Every connection is served on its own task, on the Tokio runtime
/// that [`Server::serve`] is invoked from.
#[must_use = "You must call `serve` on a `Server` to start listening for incoming connections"]
#[derive(Debug, Default)]
pub struct Server {
    incoming: Vec<IncomingStream>,
}

impl Server {
    /// Create a new [`Server`] that is not listening on any address yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the server to the given address: the server will accept incoming connections
    /// on this address when [`Server::serve`] is called.
    ///
    /// You can invoke this method multiple times to bind to multiple addresses.
    pub async fn bind(mut self, addr: SocketAddr) -> std::io::Result<Self> {
        let incoming = IncomingStream::bind(addr).await?;
        self.incoming.push(incoming);
        Ok(self)
    }

    /// Ask the server to process incoming connections from the provided [`IncomingStream`].
    ///
    /// Useful when the address must be known before the server starts, e.g. when binding
    /// to port `0` in tests.
    pub fn listen(mut self, incoming: IncomingStream) -> Self {
        self.incoming.push(incoming);
        self
    }

    /// Start listening for incoming connections.
    ///
    /// `handler` is invoked for every incoming request, together with a clone of
    /// `application_state`.
    ///
    /// # Panics
    ///
    /// It panics if it is not invoked from within a Tokio runtime.
    pub fn serve<HandlerFuture, ApplicationState>(
        self,
        handler: fn(http::Request<hyper::body::Incoming>, ApplicationState) -> HandlerFuture,
        application_state: ApplicationState,
    ) -> ServerHandle
    where
        HandlerFuture: Future<Output = Response> + Send + 'static,
        ApplicationState: Clone + Send + Sync + 'static,
    {
        ServerHandle::new(self.incoming, handler, application_state)
    }
}
