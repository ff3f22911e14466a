use std::fmt::Debug;
use std::fs::File;
use std::path::{Path, PathBuf};

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, PcapBlockOwned, PcapError, create_reader};
use tracing::debug;

use crate::error::{AppError, AppResult, CorpusError};

use super::{CapturedPacket, LinkKind, PacketSource};

/// Initial read buffer for the capture reader. Blocks that do not fit grow
/// the buffer by doubling, up to `MAX_READER_BUFFER_CAPACITY`.
const READER_BUFFER_CAPACITY: usize = 256 * 1024;
const MAX_READER_BUFFER_CAPACITY: usize = 64 * 1024 * 1024;

/// Link types announced so far by the capture's header blocks.
#[derive(Debug, Default)]
struct LinkTable {
    legacy: Option<LinkKind>,
    interfaces: Vec<LinkKind>,
}

impl LinkTable {
    fn legacy(&self) -> LinkKind {
        self.legacy.unwrap_or(LinkKind::Unsupported)
    }

    fn interface(&self, if_id: u32) -> LinkKind {
        usize::try_from(if_id)
            .ok()
            .and_then(|index| self.interfaces.get(index).copied())
            .unwrap_or(LinkKind::Unsupported)
    }
}

/// One-pass reader over a pcap or pcapng file.
///
/// The file handle is released when the source is dropped.
pub struct PcapFileSource {
    path: PathBuf,
    reader: Box<dyn PcapReaderIterator>,
    links: LinkTable,
    buffer_capacity: usize,
}

impl PcapFileSource {
    /// Opens a capture file and detects its format from the leading magic.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or is neither pcap nor
    /// pcapng.
    pub fn open(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|source| {
            AppError::corpus(CorpusError::OpenCapture {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let reader: Box<dyn PcapReaderIterator> = create_reader(READER_BUFFER_CAPACITY, file)
            .map_err(|err| invalid_capture(path, &err))?;
        debug!(path = %path.display(), "Opened capture file");

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            links: LinkTable::default(),
            buffer_capacity: READER_BUFFER_CAPACITY,
        })
    }
}

impl PacketSource for PcapFileSource {
    fn next_packet(&mut self) -> AppResult<Option<CapturedPacket>> {
        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    let packet = decode_block(&mut self.links, block);
                    self.reader.consume(offset);
                    if packet.is_some() {
                        return Ok(packet);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    self.reader
                        .refill()
                        .map_err(|err| invalid_capture(&self.path, &err))?;
                }
                Err(PcapError::BufferTooSmall) => {
                    let wanted = self.buffer_capacity.saturating_mul(2);
                    if wanted > MAX_READER_BUFFER_CAPACITY || !self.reader.grow(wanted) {
                        return Err(AppError::corpus(CorpusError::OversizedBlock {
                            path: self.path.clone(),
                            limit: self.buffer_capacity,
                        }));
                    }
                    debug!(
                        path = %self.path.display(),
                        capacity = wanted,
                        "Grew capture read buffer"
                    );
                    self.buffer_capacity = wanted;
                    self.reader
                        .refill()
                        .map_err(|err| invalid_capture(&self.path, &err))?;
                }
                Err(PcapError::UnexpectedEof) => {
                    return Err(AppError::corpus(CorpusError::TruncatedCapture {
                        path: self.path.clone(),
                    }));
                }
                Err(err) => return Err(invalid_capture(&self.path, &err)),
            }
        }
    }
}

fn decode_block(links: &mut LinkTable, block: PcapBlockOwned<'_>) -> Option<CapturedPacket> {
    match block {
        PcapBlockOwned::LegacyHeader(header) => {
            links.legacy = Some(LinkKind::from_linktype(header.network));
            None
        }
        PcapBlockOwned::Legacy(packet) => {
            Some(CapturedPacket::from_frame(links.legacy(), packet.data))
        }
        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
            links.interfaces.clear();
            None
        }
        PcapBlockOwned::NG(Block::InterfaceDescription(interface)) => {
            links
                .interfaces
                .push(LinkKind::from_linktype(interface.linktype));
            None
        }
        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
            let frame = captured_bytes(packet.data, packet.caplen);
            Some(CapturedPacket::from_frame(
                links.interface(packet.if_id),
                frame,
            ))
        }
        PcapBlockOwned::NG(Block::SimplePacket(packet)) => {
            let frame = captured_bytes(packet.data, packet.origlen);
            Some(CapturedPacket::from_frame(links.interface(0), frame))
        }
        PcapBlockOwned::NG(_) => None,
    }
}

/// Strips block padding from pcapng packet data.
fn captured_bytes(data: &[u8], len: u32) -> &[u8] {
    usize::try_from(len)
        .ok()
        .and_then(|len| data.get(..len))
        .unwrap_or(data)
}

fn invalid_capture<E>(path: &Path, err: &E) -> AppError
where
    E: Debug,
{
    AppError::corpus(CorpusError::InvalidCapture {
        path: path.to_path_buf(),
        reason: format!("{:?}", err),
    })
}
