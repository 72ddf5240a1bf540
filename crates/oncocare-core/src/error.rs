use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed specification: {0}")]
    MalformedSpecification(String),

    #[error("malformed patient record: {0}")]
    MalformedRecord(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
