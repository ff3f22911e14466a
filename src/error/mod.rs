mod app;
mod corpus;
mod transport;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use corpus::CorpusError;
pub use transport::TransportError;
pub use validation::ValidationError;
