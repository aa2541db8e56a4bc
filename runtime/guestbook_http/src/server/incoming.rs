use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, TcpStream};

/// Pending connections the kernel queues for a listener before refusing new ones.
const LISTEN_BACKLOG: i32 = 1024;

/// A listening socket the [`Server`](super::Server) accepts connections from.
#[derive(Debug)]
pub struct IncomingStream {
    listener: TcpListener,
}

impl IncomingStream {
    /// Open a listening socket on `addr`.
    ///
    /// `SO_REUSEADDR` is set, so a restarted server can bind again while
    /// connections from the previous process linger in `TIME_WAIT`.
    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr.into())?;
        socket.listen(LISTEN_BACKLOG)?;

        let listener = TcpListener::from_std(socket.into())?;
        tracing::debug!(address = %addr, "Listening for incoming connections");
        Ok(Self { listener })
    }

    /// The address the socket is actually bound to.
    ///
    /// When binding to port `0`, this is where the port picked by the OS shows up.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub(super) async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        self.listener.accept().await
    }
}
