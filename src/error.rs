use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("invalid flight configuration: {0}")]
    InvalidConfiguration(String),
    #[error("select both departure and arrival airports")]
    MissingEndpoint,
}
