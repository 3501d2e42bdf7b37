//! Error types for bundle extraction

use thiserror::Error;

/// The bundle as a whole cannot be read. This is the only fatal extraction error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Bundle must be a JSON object")]
    NotAnObject,

    #[error("Expected resourceType \"Bundle\", found \"{0}\"")]
    NotABundle(String),

    #[error("Bundle.entry must be an array")]
    EntryNotArray,
}

/// A single entry cannot be extracted. Recorded as a warning and skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry is not a JSON object")]
    EntryNotAnObject,

    #[error("entry has no resource")]
    MissingResource,

    #[error("resource is not a JSON object")]
    ResourceNotAnObject,

    #[error("resource has no resourceType")]
    MissingResourceType,
}

pub type Result<T> = std::result::Result<T, ParseError>;
