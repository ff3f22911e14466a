use std::path::Path;

use tracing::{debug, info};

use crate::capture::{PacketSource, PcapFileSource};
use crate::error::AppResult;

use super::{Corpus, Record};

/// Reads a pcap or pcapng file and keeps each packet's transport payload.
///
/// # Errors
///
/// Returns an error when the capture cannot be opened or parsed.
pub fn load_capture_file(path: &Path) -> AppResult<Corpus> {
    let source = PcapFileSource::open(path)?;
    Corpus::from_packets(source)
}

impl Corpus {
    /// Drains `source` into a corpus, one record per transport payload in
    /// capture order. Packets without a TCP or UDP layer are skipped.
    ///
    /// The source is dropped once exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `source`.
    pub fn from_packets<S>(mut source: S) -> AppResult<Self>
    where
        S: PacketSource,
    {
        let mut records = Vec::new();
        let mut seen: u64 = 0;
        let mut skipped: u64 = 0;

        while let Some(packet) = source.next_packet()? {
            seen = seen.saturating_add(1);
            match packet.payload {
                Some(payload) => records.push(Record::from(payload)),
                None => {
                    skipped = skipped.saturating_add(1);
                    debug!(packet = seen, "Skipping packet without a transport layer");
                }
            }
        }
        drop(source);

        if skipped > 0 {
            info!(
                packets = seen,
                skipped, "Skipped packets without a TCP or UDP payload"
            );
        }
        Ok(Corpus::from_records(records))
    }
}
