/// Line separator re-inserted after every text line.
pub(super) const LINE_FEED: u8 = b'\n';

/// One opaque unit of replay, written to the connection as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(Box<[u8]>);

impl Record {
    pub(super) fn line_separator() -> Self {
        Self(Box::new([LINE_FEED]))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Record {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl From<Vec<u8>> for Record {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}
