use super::{CorpusError, TransportError, ValidationError};

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        ValidationError::TestExpectation { message }
    }
}

impl From<String> for ValidationError {
    fn from(value: String) -> Self {
        ValidationError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for CorpusError {
    fn from(message: &'static str) -> Self {
        CorpusError::TestExpectation { message }
    }
}

impl From<String> for CorpusError {
    fn from(value: String) -> Self {
        CorpusError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}

impl From<&'static str> for TransportError {
    fn from(message: &'static str) -> Self {
        TransportError::TestExpectation { message }
    }
}

impl From<String> for TransportError {
    fn from(value: String) -> Self {
        TransportError::TestExpectationValue {
            message: "Test expectation failed",
            value,
        }
    }
}
