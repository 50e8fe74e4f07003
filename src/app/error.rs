use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Address validation failures, in rule precedence order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Address is required")]
    Required,

    #[error("Address is not a valid absolute URL")]
    Format,

    #[error("Address is already registered")]
    Duplicate,
}

/// The raw request for a source failed before any document was obtained.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Proxy response error: {0}")]
    Proxy(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// The document was obtained but does not match the syndication schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Document is not well-formed: {0}")]
    Malformed(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedFormat(String),

    #[error("Channel is missing its {0}")]
    MissingChannelField(&'static str),
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug)]
pub enum FeedwatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl FeedwatchError {
    /// User-facing code for failures that the form reports.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            FeedwatchError::Validation(e) => Some(e.into()),
            FeedwatchError::Acquisition(e) => Some(e.into()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedwatchError>;

/// User-facing failure codes. Display text is looked up by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "errors.required")]
    Required,
    #[serde(rename = "errors.invalidUrl")]
    InvalidUrl,
    #[serde(rename = "errors.duplicateUrl")]
    DuplicateUrl,
    #[serde(rename = "errors.networkError")]
    NetworkError,
    #[serde(rename = "errors.parsingError")]
    ParsingError,
}

impl ErrorCode {
    pub fn key(self) -> &'static str {
        match self {
            ErrorCode::Required => "errors.required",
            ErrorCode::InvalidUrl => "errors.invalidUrl",
            ErrorCode::DuplicateUrl => "errors.duplicateUrl",
            ErrorCode::NetworkError => "errors.networkError",
            ErrorCode::ParsingError => "errors.parsingError",
        }
    }

    /// Whether the failure came from fetching or parsing rather than the input.
    pub fn is_acquisition(self) -> bool {
        matches!(self, ErrorCode::NetworkError | ErrorCode::ParsingError)
    }
}

impl From<&ValidationError> for ErrorCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::Required => ErrorCode::Required,
            ValidationError::Format => ErrorCode::InvalidUrl,
            ValidationError::Duplicate => ErrorCode::DuplicateUrl,
        }
    }
}

impl From<&AcquisitionError> for ErrorCode {
    fn from(err: &AcquisitionError) -> Self {
        match err {
            AcquisitionError::Transport(_) => ErrorCode::NetworkError,
            AcquisitionError::Parse(_) => ErrorCode::ParsingError,
        }
    }
}
