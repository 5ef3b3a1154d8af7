// Centralized error handling for the CMS core

use thiserror::Error;

/// Errors raised by the key-value backends
///
/// These never leave the persistence store: `Store` logs them and reports
/// a boolean failure or an absent value instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode value: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode value: {0}")]
    Decode(serde_json::Error),

    #[error("Storage quota exceeded: {required} bytes required, {quota} bytes available")]
    QuotaExceeded { required: usize, quota: usize },

    #[error("Journal lock poisoned")]
    Poisoned,

    #[error("Malformed journal entry: {0}")]
    Journal(String),
}

/// A draft was rejected before reaching the collection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Attachment in {0} is not an embedded PDF document")]
    InvalidAttachment(&'static str),
}

/// Errors returned by collection manager commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("No {kind} id left after {last}")]
    IdsExhausted { kind: &'static str, last: i64 },
}

impl CollectionError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        CollectionError::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

/// An uploaded file was rejected by the PDF codec
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Only PDF files are accepted (got {media_type})")]
    NotPdf { media_type: String },

    #[error("File is too large: {size} bytes > {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    // Same message whichever field was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,
}
