use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket, lookup_host};

use crate::error::{AppError, AppResult, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection-oriented byte stream (TCP).
    Stream,
    /// Connected datagram socket (UDP), one datagram per record.
    Datagram,
}

impl TransportKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TransportKind::Stream => "tcp",
            TransportKind::Datagram => "udp",
        }
    }
}

/// Resolves a `host:port` destination to the first address returned.
///
/// # Errors
///
/// Returns an error when the name cannot be resolved or yields no addresses.
pub async fn resolve_destination(address: &str) -> AppResult<SocketAddr> {
    let mut addrs = lookup_host(address).await.map_err(|source| {
        AppError::transport(TransportError::Resolve {
            address: address.to_owned(),
            source,
        })
    })?;
    addrs.next().ok_or_else(|| {
        AppError::transport(TransportError::NoAddressesResolved {
            address: address.to_owned(),
        })
    })
}

#[derive(Debug)]
enum Link {
    Stream(TcpStream),
    Datagram(UdpSocket),
}

/// An outbound connection exclusively owned by one worker.
#[derive(Debug)]
pub struct Connection {
    endpoint: SocketAddr,
    link: Link,
}

impl Connection {
    /// Opens a connection of the given kind to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the socket cannot be bound or connected.
    pub async fn open(kind: TransportKind, endpoint: SocketAddr) -> AppResult<Self> {
        let link = match kind {
            TransportKind::Stream => TcpStream::connect(endpoint)
                .await
                .map(Link::Stream)
                .map_err(|source| connect_error(kind, endpoint, source))?,
            TransportKind::Datagram => {
                let bind_addr = if endpoint.is_ipv4() {
                    "0.0.0.0:0"
                } else {
                    "[::]:0"
                };
                let socket = UdpSocket::bind(bind_addr).await.map_err(|source| {
                    AppError::transport(TransportError::Bind {
                        transport: kind.as_str(),
                        source,
                    })
                })?;
                socket
                    .connect(endpoint)
                    .await
                    .map_err(|source| connect_error(kind, endpoint, source))?;
                Link::Datagram(socket)
            }
        };
        Ok(Self { endpoint, link })
    }

    #[must_use]
    pub const fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    #[must_use]
    pub fn kind(&self) -> TransportKind {
        match self.link {
            Link::Stream(_) => TransportKind::Stream,
            Link::Datagram(_) => TransportKind::Datagram,
        }
    }

    /// Writes `bytes` in full: the whole buffer on a stream, exactly one
    /// datagram on a datagram socket.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails or a datagram is truncated.
    pub async fn send(&mut self, bytes: &[u8]) -> AppResult<()> {
        let endpoint = self.endpoint;
        match &mut self.link {
            Link::Stream(stream) => stream
                .write_all(bytes)
                .await
                .map_err(|source| write_error(TransportKind::Stream, endpoint, source)),
            Link::Datagram(socket) => {
                let sent = socket
                    .send(bytes)
                    .await
                    .map_err(|source| write_error(TransportKind::Datagram, endpoint, source))?;
                if sent != bytes.len() {
                    return Err(AppError::transport(TransportError::ShortDatagram {
                        endpoint,
                        sent,
                        expected: bytes.len(),
                    }));
                }
                Ok(())
            }
        }
    }
}

fn connect_error(kind: TransportKind, endpoint: SocketAddr, source: std::io::Error) -> AppError {
    AppError::transport(TransportError::Connect {
        endpoint,
        transport: kind.as_str(),
        source,
    })
}

fn write_error(kind: TransportKind, endpoint: SocketAddr, source: std::io::Error) -> AppError {
    AppError::transport(TransportError::Write {
        endpoint,
        transport: kind.as_str(),
        source,
    })
}
