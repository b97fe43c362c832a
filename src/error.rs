use thiserror::Error;

#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image service error: {0}")]
    ImageService(String),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Object of type {type_name} is not JSON serializable")]
    UnsupportedType { type_name: String },
}

pub type Result<T> = std::result::Result<T, FunctionError>;
