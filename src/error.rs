use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum HmError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("Invalid hypermedia id: {0}")]
    InvalidId(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for HmError {
    fn from(src: toml::de::Error) -> HmError {
        HmError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for HmError {
    fn from(src: toml::ser::Error) -> HmError {
        HmError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for HmError {
    fn from(src: JsonError) -> HmError {
        HmError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for HmError {
    fn from(src: UrlParseError) -> HmError {
        HmError::Config(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for HmError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => HmError::NotFound(format!("{x}")),
            _ => HmError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for HmError {
    fn from(x: fmt::Error) -> Self {
        HmError::Serialization(format!("{x}"))
    }
}
