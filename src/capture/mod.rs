//! Packet-capture reading.
//!
//! A capture file is consumed as a sequential, one-pass stream of
//! [`CapturedPacket`]s. Only the transport-layer payload survives; link,
//! network and transport headers are decoded and discarded here so the
//! corpus builder never sees them.
mod link;
mod pcap;

#[cfg(test)]
pub(crate) mod test_support;

pub use link::{LinkKind, transport_payload};
pub use pcap::PcapFileSource;

use crate::error::AppResult;

/// One packet reduced to what replay needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    /// Bytes above the TCP or UDP header. `None` when the packet carries no
    /// recognisable transport layer.
    pub payload: Option<Vec<u8>>,
}

impl CapturedPacket {
    #[must_use]
    pub fn from_frame(link: LinkKind, frame: &[u8]) -> Self {
        Self {
            payload: transport_payload(link, frame),
        }
    }
}

/// Sequential source of captured packets, ending with `Ok(None)`.
pub trait PacketSource {
    /// Returns the next packet in capture order.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying capture cannot be read or parsed.
    fn next_packet(&mut self) -> AppResult<Option<CapturedPacket>>;
}
