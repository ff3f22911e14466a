use etherparse::{LinuxSllPacketType, PacketBuilder};

use crate::error::{AppError, AppResult, CorpusError};

const ETHERTYPE_ARP: [u8; 2] = [0x08, 0x06];
const SRC_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
const DST_MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
const SRC_IP: [u8; 4] = [10, 0, 0, 1];
const DST_IP: [u8; 4] = [10, 0, 0, 2];
/// Largest snapshot length tcpdump and Wireshark write.
pub(crate) const MAX_SNAPLEN: usize = 262_144;
const SNAPLEN_FIELD: u32 = 262_144;
pub(crate) const LINKTYPE_NULL: u16 = 0;
pub(crate) const LINKTYPE_ETHERNET: u16 = 1;
pub(crate) const LINKTYPE_RAW: u16 = 101;
pub(crate) const LINKTYPE_LINUX_SLL: u16 = 113;

fn build_error<E: std::fmt::Debug>(err: &E) -> AppError {
    AppError::corpus(CorpusError::from(format!("build packet failed: {:?}", err)))
}

pub(crate) fn udp_frame(payload: &[u8]) -> AppResult<Vec<u8>> {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4(SRC_IP, DST_IP, 64)
        .udp(40000, 1514);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .map_err(|err| build_error(&err))?;
    Ok(frame)
}

pub(crate) fn tcp_frame(payload: &[u8]) -> AppResult<Vec<u8>> {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4(SRC_IP, DST_IP, 64)
        .tcp(40000, 1514, 1, 65535);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .map_err(|err| build_error(&err))?;
    Ok(frame)
}

pub(crate) fn raw_ipv4_udp_packet(payload: &[u8]) -> AppResult<Vec<u8>> {
    let builder = PacketBuilder::ipv4(SRC_IP, DST_IP, 64).udp(40000, 1514);
    let mut packet = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut packet, payload)
        .map_err(|err| build_error(&err))?;
    Ok(packet)
}

pub(crate) fn sll_udp_frame(payload: &[u8]) -> AppResult<Vec<u8>> {
    let builder = PacketBuilder::linux_sll(LinuxSllPacketType::OTHERHOST, 6, [2, 0, 0, 0, 0, 1, 0, 0])
        .ipv4(SRC_IP, DST_IP, 64)
        .udp(40000, 1514);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .map_err(|err| build_error(&err))?;
    Ok(frame)
}

pub(crate) fn icmp_frame() -> AppResult<Vec<u8>> {
    let builder = PacketBuilder::ethernet2(SRC_MAC, DST_MAC)
        .ipv4(SRC_IP, DST_IP, 64)
        .icmpv4_echo_request(7, 1);
    let payload = b"ping";
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder
        .write(&mut frame, payload)
        .map_err(|err| build_error(&err))?;
    Ok(frame)
}

pub(crate) fn arp_frame() -> Vec<u8> {
    let mut frame = Vec::with_capacity(42);
    frame.extend_from_slice(&DST_MAC);
    frame.extend_from_slice(&SRC_MAC);
    frame.extend_from_slice(&ETHERTYPE_ARP);
    frame.extend_from_slice(&[0_u8; 28]);
    frame
}

/// Classic little-endian pcap with microsecond timestamps.
pub(crate) fn pcap_bytes(linktype: u16, frames: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xa1b2_c3d4_u32.to_le_bytes());
    out.extend_from_slice(&2_u16.to_le_bytes());
    out.extend_from_slice(&4_u16.to_le_bytes());
    out.extend_from_slice(&0_i32.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&SNAPLEN_FIELD.to_le_bytes());
    out.extend_from_slice(&u32::from(linktype).to_le_bytes());
    for (index, frame) in frames.iter().enumerate() {
        let len = u32::try_from(frame.len()).unwrap_or(u32::MAX);
        let ts_sec = u32::try_from(index).unwrap_or(u32::MAX);
        out.extend_from_slice(&ts_sec.to_le_bytes());
        out.extend_from_slice(&0_u32.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(frame);
    }
    out
}

/// One packet block in a synthetic pcapng section.
pub(crate) enum NgPacket<'frame> {
    /// Enhanced packet block on interface `if_id`.
    Enhanced { if_id: u32, frame: &'frame [u8] },
    /// Simple packet block, implicitly on the first interface.
    Simple(&'frame [u8]),
}

/// Minimal pcapng: one section, one Ethernet interface, enhanced packet blocks.
pub(crate) fn pcapng_bytes(frames: &[Vec<u8>]) -> Vec<u8> {
    let packets: Vec<NgPacket<'_>> = frames
        .iter()
        .map(|frame| NgPacket::Enhanced { if_id: 0, frame })
        .collect();
    pcapng_section(&[LINKTYPE_ETHERNET], &packets)
}

/// Little-endian pcapng section with one interface per entry of `linktypes`.
pub(crate) fn pcapng_section(linktypes: &[u16], packets: &[NgPacket<'_>]) -> Vec<u8> {
    let mut out = Vec::new();

    out.extend_from_slice(&0x0a0d_0d0a_u32.to_le_bytes());
    out.extend_from_slice(&28_u32.to_le_bytes());
    out.extend_from_slice(&0x1a2b_3c4d_u32.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&0_u16.to_le_bytes());
    out.extend_from_slice(&(-1_i64).to_le_bytes());
    out.extend_from_slice(&28_u32.to_le_bytes());

    for linktype in linktypes {
        out.extend_from_slice(&1_u32.to_le_bytes());
        out.extend_from_slice(&20_u32.to_le_bytes());
        out.extend_from_slice(&linktype.to_le_bytes());
        out.extend_from_slice(&0_u16.to_le_bytes());
        out.extend_from_slice(&SNAPLEN_FIELD.to_le_bytes());
        out.extend_from_slice(&20_u32.to_le_bytes());
    }

    for packet in packets {
        match packet {
            NgPacket::Enhanced { if_id, frame } => {
                let (padded, padding) = padded_len(frame);
                let block_len = block_len(padded, 32);
                let caplen = u32::try_from(frame.len()).unwrap_or(u32::MAX);
                out.extend_from_slice(&6_u32.to_le_bytes());
                out.extend_from_slice(&block_len.to_le_bytes());
                out.extend_from_slice(&if_id.to_le_bytes());
                out.extend_from_slice(&0_u32.to_le_bytes());
                out.extend_from_slice(&0_u32.to_le_bytes());
                out.extend_from_slice(&caplen.to_le_bytes());
                out.extend_from_slice(&caplen.to_le_bytes());
                out.extend_from_slice(frame);
                out.extend(std::iter::repeat_n(0_u8, padding));
                out.extend_from_slice(&block_len.to_le_bytes());
            }
            NgPacket::Simple(frame) => {
                let (padded, padding) = padded_len(frame);
                let block_len = block_len(padded, 16);
                let origlen = u32::try_from(frame.len()).unwrap_or(u32::MAX);
                out.extend_from_slice(&3_u32.to_le_bytes());
                out.extend_from_slice(&block_len.to_le_bytes());
                out.extend_from_slice(&origlen.to_le_bytes());
                out.extend_from_slice(frame);
                out.extend(std::iter::repeat_n(0_u8, padding));
                out.extend_from_slice(&block_len.to_le_bytes());
            }
        }
    }
    out
}

fn padded_len(frame: &[u8]) -> (usize, usize) {
    let padding = frame.len().wrapping_neg() % 4;
    (frame.len().saturating_add(padding), padding)
}

fn block_len(padded: usize, overhead: usize) -> u32 {
    u32::try_from(padded.saturating_add(overhead)).unwrap_or(u32::MAX)
}
