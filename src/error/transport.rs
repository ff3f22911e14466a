use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to resolve destination '{address}': {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Destination '{address}' resolved to no addresses.")]
    NoAddressesResolved { address: String },
    #[error("Failed to bind local {transport} socket: {source}")]
    Bind {
        transport: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to connect to {endpoint} over {transport}: {source}")]
    Connect {
        endpoint: SocketAddr,
        transport: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write to {endpoint} over {transport}: {source}")]
    Write {
        endpoint: SocketAddr,
        transport: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Datagram to {endpoint} truncated: sent {sent} of {expected} bytes.")]
    ShortDatagram {
        endpoint: SocketAddr,
        sent: usize,
        expected: usize,
    },
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
