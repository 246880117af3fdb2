use thiserror::Error;

#[derive(Error, Debug)]
pub enum LottoError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Draw value '{value}' in phase {phase} is not a number")]
    NumberParseError { phase: String, value: String },

    #[error("Draw value {value} in phase {phase} is outside the candidate universe")]
    OutOfRangeError { phase: String, value: u32 },
}

pub type Result<T> = std::result::Result<T, LottoError>;
