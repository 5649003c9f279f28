//! Error types for registry lookups and the pins file

use thiserror::Error;

/// Failure while resolving a single image's latest tag
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request to {url} failed with HTTP status {status}")]
    Http { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("too many redirects while fetching {url}")]
    TooManyRedirects { url: String },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{image} has no \"latest\" tag")]
    MissingLatest { image: String },

    #[error("no tag of {image} matches the digest of latest ({digest})")]
    NoMatchingTag { image: String, digest: String },

    #[error("latest tag of {image} references {count} images, expected exactly one")]
    MultiImageLatest { image: String, count: usize },

    #[error("tag {tag:?} of {image} is not a version: {reason}")]
    InvalidVersion {
        image: String,
        tag: String,
        reason: String,
    },

    #[error("{image} has no tags besides latest")]
    NoVersionedTags { image: String },
}

/// Failure while reading or writing the pinned images file
#[derive(Debug, Error)]
pub enum PinsError {
    #[error("line {line}: entry outside of any section")]
    EntryOutsideSection { line: usize },

    #[error("line {line}: expected `key = value`, got {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("line {line}: malformed section header {content:?}")]
    MalformedSection { line: usize, content: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
