// src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("Attachment error: {0}")]
    Attachment(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CareError {
    pub fn api_error(msg: impl Into<String>) -> Self {
        CareError::Api(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        CareError::Config(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        CareError::Validation(msg.into())
    }

    pub fn attachment_error(msg: impl Into<String>) -> Self {
        CareError::Attachment(msg.into())
    }
}

pub type CareResult<T> = Result<T, CareError>;
