use etherparse::{SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

/// Length of the address-family header that prefixes BSD loopback frames.
const BSD_LOOPBACK_HEADER_LEN: usize = 4;

/// Link-layer framing of a capture interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Ethernet,
    RawIp,
    LinuxSll,
    BsdLoopback,
    Unsupported,
}

impl LinkKind {
    #[must_use]
    pub fn from_linktype(linktype: Linktype) -> Self {
        match linktype {
            Linktype::ETHERNET => LinkKind::Ethernet,
            Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => LinkKind::RawIp,
            Linktype::LINUX_SLL => LinkKind::LinuxSll,
            Linktype::NULL | Linktype::LOOP => LinkKind::BsdLoopback,
            _ => LinkKind::Unsupported,
        }
    }
}

/// Extracts the payload above the TCP or UDP header of a captured frame.
///
/// Returns `None` for frames that fail to decode, ICMP, IP fragments past the
/// first, and anything on an unsupported link type.
#[must_use]
pub fn transport_payload(link: LinkKind, frame: &[u8]) -> Option<Vec<u8>> {
    let sliced = match link {
        LinkKind::Ethernet => SlicedPacket::from_ethernet(frame).ok(),
        LinkKind::RawIp => SlicedPacket::from_ip(frame).ok(),
        LinkKind::LinuxSll => SlicedPacket::from_linux_sll(frame).ok(),
        LinkKind::BsdLoopback => frame
            .get(BSD_LOOPBACK_HEADER_LEN..)
            .and_then(|packet| SlicedPacket::from_ip(packet).ok()),
        LinkKind::Unsupported => None,
    }?;

    match sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => Some(tcp.payload().to_vec()),
        Some(TransportSlice::Udp(udp)) => Some(udp.payload().to_vec()),
        Some(TransportSlice::Icmpv4(_) | TransportSlice::Icmpv6(_)) | None => None,
    }
}
