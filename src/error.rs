use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherBreakError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    #[error("Invalid Tensor: {0}")]
    InvalidTensor(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type CbResult<T> = Result<T, CipherBreakError>;
