//! Error types for the CoW order signing client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type: {name}")]
    UnknownType { name: String },

    #[error("missing field {field} for type {type_name}")]
    MissingField { type_name: String, field: String },

    #[error("length mismatch for {field_type}: expected {expected}, got {actual}")]
    LengthMismatch {
        field_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("value {value} out of range for {field_type}")]
    OutOfRange { field_type: String, value: String },

    #[error("value does not match declared type {field_type}")]
    TypeMismatch { field_type: String },

    #[error("invalid signing key: {message}")]
    InvalidKey { message: String },

    #[error("signing error: {message}")]
    Signing { message: String },

    #[error("invalid quote data: {0}")]
    InvalidQuote(String),

    #[error("service rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
