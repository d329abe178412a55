//! Error types for parcel.
//!
//! Every failure is synchronous: codecs return their error to the selector,
//! which hands it back unchanged. Nothing is retried and no partial request
//! is ever produced.

use derive_more::{Display, Error, From};

// ============================================================================
// Error Subtypes
// ============================================================================

/// Problems with the URL string handed to a request.
///
/// These are caller input defects and are reported before any encoding runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum UrlFormatError {
    /// The string could not be parsed as a URL.
    #[display("invalid URL")]
    InvalidUrl,
    /// The URL has no scheme (e.g. `apple.com`).
    #[display("no scheme provided")]
    NoSchemeProvided,
    /// The URL has no host (e.g. `http://`).
    #[display("no host provided")]
    NoHostProvided,
}

/// Failures while placing an encoded query into a URL.
///
/// Unreachable for URLs that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum UrlEncodingError {
    /// The URL cannot be split into components that carry a query.
    #[display("could not decompose URL into components")]
    NoComponentsFromUrl,
    /// The components no longer form a valid URL once the query is set.
    #[display("could not recompose URL from components")]
    NoUrlFromComponents,
}

/// Failures while writing a `multipart/form-data` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum MultipartEncodingError {
    /// A part header could not be written as a header line.
    #[display("could not encode part header")]
    HeaderEncoding,
    /// A boundary marker was unavailable where one is required.
    #[display("no boundary available")]
    NoBoundary,
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for parcel operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The request URL is malformed.
    #[display("URL format error: {_0}")]
    #[from]
    UrlFormat(UrlFormatError),

    /// Query placement failed.
    #[display("URL encoding error: {_0}")]
    #[from]
    UrlEncoding(UrlEncodingError),

    /// JSON serialization of the parameters failed.
    #[display("JSON encoding error: {_0}")]
    #[from]
    JsonEncoding(serde_json::Error),

    /// Multipart body construction failed.
    #[display("multipart encoding error: {_0}")]
    #[from]
    MultipartEncoding(MultipartEncodingError),

    /// An attachment was found where only text values can be encoded.
    #[display("attachment at '{key}' is only supported by multipart encoding")]
    #[from(skip)]
    UnsupportedAttachment {
        /// Bracketed key of the offending attachment.
        #[error(not(source))]
        key: String,
    },

    /// The method token is not one of the supported HTTP methods.
    #[display("unsupported HTTP method: {_0}")]
    #[from(skip)]
    UnsupportedMethod(#[error(not(source))] String),

    /// A custom encoder failed.
    #[display("encoding error: {_0}")]
    #[from(skip)]
    Encoding(#[error(not(source))] String),

    /// The transport rejected or failed to deliver the request.
    #[display("transport error: {_0}")]
    #[from(skip)]
    Transport(#[error(not(source))] String),

    /// The transport did not complete in time.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported attachment error for the given key.
    #[must_use]
    pub fn unsupported_attachment(key: impl Into<String>) -> Self {
        Self::UnsupportedAttachment { key: key.into() }
    }

    /// Create a custom encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns `true` if the request URL was rejected.
    #[must_use]
    pub const fn is_url_format(&self) -> bool {
        matches!(self, Self::UrlFormat(_))
    }

    /// Returns `true` if this error signals a broken internal invariant
    /// rather than bad caller input.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UrlEncoding(_) | Self::MultipartEncoding(MultipartEncodingError::NoBoundary)
        )
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
