//! Media types for multipart parts.
//!
//! A closed set of common `type/subtype` pairs plus [`MediaType::Raw`] for
//! anything else.

use std::fmt;
use std::str::FromStr;

use derive_more::Display;

/// Subtypes of `image/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ImageSubtype {
    /// `image/*`
    #[display("*")]
    Any,
    /// `image/gif`
    #[display("gif")]
    Gif,
    /// `image/jpeg`
    #[display("jpeg")]
    Jpeg,
    /// `image/png`
    #[display("png")]
    Png,
    /// `image/tiff`
    #[display("tiff")]
    Tiff,
}

/// Subtypes of `text/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TextSubtype {
    /// `text/*`
    #[display("*")]
    Any,
    /// `text/css`
    #[display("css")]
    Css,
    /// `text/csv`
    #[display("csv")]
    Csv,
    /// `text/html`
    #[display("html")]
    Html,
    /// `text/javascript`
    #[display("javascript")]
    Javascript,
    /// `text/plain`
    #[display("plain")]
    Plain,
    /// `text/php`
    #[display("php")]
    Php,
    /// `text/xml`
    #[display("xml")]
    Xml,
}

/// Subtypes of `application/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ApplicationSubtype {
    /// `application/*`
    #[display("*")]
    Any,
    /// `application/json`
    #[display("json")]
    Json,
    /// `application/javascript`
    #[display("javascript")]
    Javascript,
    /// `application/octet-stream`
    #[display("octet-stream")]
    OctetStream,
    /// `application/pdf`
    #[display("pdf")]
    Pdf,
    /// `application/zip`
    #[display("zip")]
    Zip,
    /// `application/gzip`
    #[display("gzip")]
    Gzip,
}

/// Media type written in a part's `Content-Type` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `image/<subtype>`
    Image(ImageSubtype),
    /// `text/<subtype>`
    Text(TextSubtype),
    /// `application/<subtype>`
    Application(ApplicationSubtype),
    /// Any other MIME string, written verbatim.
    Raw(String),
}

impl MediaType {
    /// `application/octet-stream`
    pub const OCTET_STREAM: Self = Self::Application(ApplicationSubtype::OctetStream);

    /// `text/plain`
    pub const PLAIN_TEXT: Self = Self::Text(TextSubtype::Plain);

    /// Create a media type from an arbitrary MIME string.
    #[must_use]
    pub fn raw(value: impl Into<String>) -> Self {
        Self::Raw(value.into())
    }

    /// Guess the media type from a file name extension.
    ///
    /// Returns `None` when the file has no extension or the extension is
    /// not known.
    ///
    /// ```
    /// use parcel_core::{ImageSubtype, MediaType};
    ///
    /// assert_eq!(
    ///     MediaType::from_file_name("PHOTO.JPG"),
    ///     Some(MediaType::Image(ImageSubtype::Jpeg))
    /// );
    /// assert_eq!(MediaType::from_file_name("README"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    /// Media type for a bare extension (without the dot), case-insensitive.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let media_type = match extension.to_ascii_lowercase().as_str() {
            // Images
            "gif" => Self::Image(ImageSubtype::Gif),
            "jpg" | "jpeg" => Self::Image(ImageSubtype::Jpeg),
            "png" => Self::Image(ImageSubtype::Png),
            "tif" | "tiff" => Self::Image(ImageSubtype::Tiff),
            "svg" => Self::raw("image/svg+xml"),
            "webp" => Self::raw("image/webp"),
            // Text
            "css" => Self::Text(TextSubtype::Css),
            "csv" => Self::Text(TextSubtype::Csv),
            "htm" | "html" => Self::Text(TextSubtype::Html),
            "php" => Self::Text(TextSubtype::Php),
            "txt" => Self::Text(TextSubtype::Plain),
            "xml" => Self::Text(TextSubtype::Xml),
            "md" => Self::raw("text/markdown"),
            // Application
            "js" | "mjs" => Self::Application(ApplicationSubtype::Javascript),
            "json" => Self::Application(ApplicationSubtype::Json),
            "bin" => Self::Application(ApplicationSubtype::OctetStream),
            "pdf" => Self::Application(ApplicationSubtype::Pdf),
            "zip" => Self::Application(ApplicationSubtype::Zip),
            "gz" | "gzip" => Self::Application(ApplicationSubtype::Gzip),
            "wasm" => Self::raw("application/wasm"),
            _ => return None,
        };
        Some(media_type)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(subtype) => write!(f, "image/{subtype}"),
            Self::Text(subtype) => write!(f, "text/{subtype}"),
            Self::Application(subtype) => write!(f, "application/{subtype}"),
            Self::Raw(value) => f.write_str(value),
        }
    }
}

impl FromStr for MediaType {
    type Err = std::convert::Infallible;

    /// Parse a MIME string, mapping known pairs onto the closed taxonomy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = match s {
            "image/*" => Self::Image(ImageSubtype::Any),
            "image/gif" => Self::Image(ImageSubtype::Gif),
            "image/jpeg" => Self::Image(ImageSubtype::Jpeg),
            "image/png" => Self::Image(ImageSubtype::Png),
            "image/tiff" => Self::Image(ImageSubtype::Tiff),
            "text/*" => Self::Text(TextSubtype::Any),
            "text/css" => Self::Text(TextSubtype::Css),
            "text/csv" => Self::Text(TextSubtype::Csv),
            "text/html" => Self::Text(TextSubtype::Html),
            "text/javascript" => Self::Text(TextSubtype::Javascript),
            "text/plain" => Self::Text(TextSubtype::Plain),
            "text/php" => Self::Text(TextSubtype::Php),
            "text/xml" => Self::Text(TextSubtype::Xml),
            "application/*" => Self::Application(ApplicationSubtype::Any),
            "application/json" => Self::Application(ApplicationSubtype::Json),
            "application/javascript" => Self::Application(ApplicationSubtype::Javascript),
            "application/octet-stream" => Self::Application(ApplicationSubtype::OctetStream),
            "application/pdf" => Self::Application(ApplicationSubtype::Pdf),
            "application/zip" => Self::Application(ApplicationSubtype::Zip),
            "application/gzip" => Self::Application(ApplicationSubtype::Gzip),
            other => Self::raw(other),
        };
        Ok(known)
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(media_type) => media_type,
            Err(never) => match never {},
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}
