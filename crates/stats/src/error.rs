use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("invalid analysis input: {0}")]
    InvalidInput(String),
}
