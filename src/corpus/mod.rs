//! Replay corpus: the ordered, immutable collection of records every worker
//! streams.
//!
//! A corpus is built exactly once, before any worker is spawned, from either
//! a line-delimited text file or a packet capture. After construction it is
//! only ever read, typically through an `Arc<Corpus>` shared by the workers.
mod packets;
mod record;
mod text;


use std::path::Path;

use tracing::info;

use crate::error::AppResult;

pub use packets::load_capture_file;
pub use record::Record;
pub use text::load_text_file;

/// How the replay file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Line-feed separated text; each line replays followed by a `\n` record.
    Text,
    /// pcap/pcapng capture; each TCP or UDP payload replays as one record.
    Capture,
}

impl InputMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InputMode::Text => "text",
            InputMode::Capture => "capture",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    records: Vec<Record>,
    total_bytes: u64,
}

impl Corpus {
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let total_bytes = records.iter().fold(0_u64, |total, record| {
            total.saturating_add(u64::try_from(record.len()).unwrap_or(u64::MAX))
        });
        Self {
            records,
            total_bytes,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Bytes written by one full pass over the corpus.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

impl FromIterator<Record> for Corpus {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

/// Loads the replay file at `path` according to `mode`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or, in capture mode, when
/// the capture cannot be parsed.
pub fn load(path: &Path, mode: InputMode) -> AppResult<Corpus> {
    let corpus = match mode {
        InputMode::Text => load_text_file(path)?,
        InputMode::Capture => load_capture_file(path)?,
    };
    info!(
        path = %path.display(),
        mode = mode.as_str(),
        records = corpus.len(),
        bytes = corpus.total_bytes(),
        "Loaded replay corpus"
    );
    Ok(corpus)
}
