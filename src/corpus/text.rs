use std::path::Path;

use crate::error::{AppError, AppResult, CorpusError};

use super::record::LINE_FEED;
use super::{Corpus, Record};

/// Reads a text file and splits it into line records.
///
/// # Errors
///
/// Returns an error when the file cannot be read.
pub fn load_text_file(path: &Path) -> AppResult<Corpus> {
    let data = std::fs::read(path).map_err(|source| {
        AppError::corpus(CorpusError::ReadFile {
            path: path.to_path_buf(),
            source,
        })
    })?;
    Ok(Corpus::from_text(&data))
}

impl Corpus {
    /// Splits `data` on line feeds, keeping every segment verbatim and
    /// following each one with a single `\n` record.
    ///
    /// Carriage returns are not stripped, and a trailing line feed yields a
    /// final empty segment. Every record except the last separator
    /// concatenates back to `data`.
    #[must_use]
    pub fn from_text(data: &[u8]) -> Self {
        data.split(|byte| *byte == LINE_FEED)
            .flat_map(|line| [Record::from(line), Record::line_separator()])
            .collect()
    }
}
