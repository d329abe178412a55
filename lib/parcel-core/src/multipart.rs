//! Parts and boundaries for `multipart/form-data` bodies.
//!
//! A [`Part`] is one named segment of the body; a [`Boundary`] is the token
//! that delimits segments. The body itself is assembled by
//! [`MultipartEncoding`](crate::MultipartEncoding).
//!
//! # Example
//!
//! ```
//! use parcel_core::{MediaType, Part};
//!
//! let avatar = Part::file("avatar", "photo.png", vec![0x89, 0x50, 0x4E, 0x47]);
//! assert_eq!(avatar.media_type(), MediaType::from_file_name("photo.png").as_ref());
//!
//! let note = Part::text("note", "hello").with_media_type("text/plain");
//! assert_eq!(note.media_type(), Some(&MediaType::PLAIN_TEXT));
//! ```

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use crate::MediaType;
use crate::error::MultipartEncodingError;

const NEW_LINE: &[u8] = b"\r\n";

/// Longest boundary allowed by RFC 2046.
const MAX_BOUNDARY_LEN: usize = 70;

// ============================================================================
// Part
// ============================================================================

/// A single segment of a multipart body.
///
/// Parts are immutable once built; the `with_*` methods consume and return
/// a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    data: Bytes,
    media_type: Option<MediaType>,
    file_name: Option<String>,
}

impl Part {
    /// Create a part with the given name and raw data, without media type
    /// or file name.
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            media_type: None,
            file_name: None,
        }
    }

    /// Create a text part.
    ///
    /// No `Content-Type` line is written for it, which form parsers read as
    /// `text/plain`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Bytes::from(value.into()))
    }

    /// Create a binary part typed `application/octet-stream`.
    #[must_use]
    pub fn bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(name, data).with_media_type(MediaType::OCTET_STREAM)
    }

    /// Create a file part.
    ///
    /// The media type is guessed from the file name extension, falling back
    /// to `application/octet-stream`.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let media_type = MediaType::from_file_name(&file_name).unwrap_or(MediaType::OCTET_STREAM);
        Self {
            name: name.into(),
            data: data.into(),
            media_type: Some(media_type),
            file_name: Some(file_name),
        }
    }

    /// Replace the part name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the file name for this part.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the media type for this part.
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<MediaType>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Get the part name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the part data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Get the media type, if set.
    #[must_use]
    pub fn media_type(&self) -> Option<&MediaType> {
        self.media_type.as_ref()
    }

    /// Get the file name, if set.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Write the header block and the data of this part.
    ///
    /// The header block is a `Content-Disposition` line, an optional
    /// `Content-Type` line and a blank line.
    pub(crate) fn write_to(&self, buf: &mut BytesMut) -> Result<(), MultipartEncodingError> {
        let media_type = self.media_type.as_ref().map(ToString::to_string);
        if media_type
            .as_deref()
            .is_some_and(|value| !is_header_safe(value))
        {
            return Err(MultipartEncodingError::HeaderEncoding);
        }

        buf.put_slice(b"Content-Disposition: form-data; name=\"");
        buf.put_slice(escape_quoted(&self.name).as_bytes());
        buf.put_slice(b"\"");
        if let Some(file_name) = &self.file_name {
            buf.put_slice(b"; filename=\"");
            buf.put_slice(escape_quoted(file_name).as_bytes());
            buf.put_slice(b"\"");
        }
        buf.put_slice(NEW_LINE);

        if let Some(media_type) = media_type {
            buf.put_slice(b"Content-Type: ");
            buf.put_slice(media_type.as_bytes());
            buf.put_slice(NEW_LINE);
        }

        buf.put_slice(NEW_LINE);
        buf.put_slice(&self.data);
        Ok(())
    }
}

/// Escape a value written inside a quoted header parameter.
///
/// `"`, CR and LF are percent-encoded, matching what browsers send.
fn escape_quoted(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\r', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// A header value must be visible ASCII, spaces or tabs.
fn is_header_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b == b'\t' || (b.is_ascii() && !b.is_ascii_control()))
}

// ============================================================================
// Boundary
// ============================================================================

/// Delimiter token separating the parts of a multipart body.
///
/// A boundary is created once per encode call and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    value: String,
}

impl Default for Boundary {
    fn default() -> Self {
        Self::generate()
    }
}

impl Boundary {
    /// Create a boundary from two random 32-bit groups.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            value: format!(
                "parcel.boundary.{:08x}{:08x}",
                fastrand::u32(..),
                fastrand::u32(..)
            ),
        }
    }

    /// Use a caller-chosen boundary value.
    ///
    /// The value should not appear in any part data. Values that are not
    /// valid RFC 2046 boundaries produce no markers.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The boundary token, as written in the `Content-Type` header.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` if the token is 1 to 70 boundary characters and does
    /// not end with a space.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let bytes = self.value.as_bytes();
        (1..=MAX_BOUNDARY_LEN).contains(&bytes.len())
            && bytes.iter().copied().all(is_boundary_char)
            && !bytes.ends_with(b" ")
    }

    /// Marker that opens the body: `--<value>\r\n`.
    #[must_use]
    pub fn initial(&self) -> Option<Bytes> {
        self.marker(b"", b"")
    }

    /// Marker placed between two parts: `\r\n--<value>\r\n`.
    #[must_use]
    pub fn encapsulated(&self) -> Option<Bytes> {
        self.marker(NEW_LINE, b"")
    }

    /// Marker that closes the body: `\r\n--<value>--\r\n`.
    #[must_use]
    pub fn final_marker(&self) -> Option<Bytes> {
        self.marker(NEW_LINE, b"--")
    }

    fn marker(&self, prefix: &[u8], suffix: &[u8]) -> Option<Bytes> {
        if !self.is_valid() {
            return None;
        }

        let mut buf =
            BytesMut::with_capacity(prefix.len() + self.value.len() + suffix.len() + 4);
        buf.put_slice(prefix);
        buf.put_slice(b"--");
        buf.put_slice(self.value.as_bytes());
        buf.put_slice(suffix);
        buf.put_slice(NEW_LINE);
        Some(buf.freeze())
    }
}

/// `bchars` from RFC 2046 section 5.1.1.
const fn is_boundary_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'='
                | b'?' | b' '
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApplicationSubtype, ImageSubtype};

    fn rendered(part: &Part) -> String {
        let mut buf = BytesMut::new();
        part.write_to(&mut buf).expect("header should encode");
        String::from_utf8(buf.to_vec()).expect("utf8")
    }

    #[test]
    fn part_text_has_no_media_type() {
        let part = Part::text("field", "value");
        assert_eq!(part.name(), "field");
        assert_eq!(part.data().as_ref(), b"value");
        assert!(part.media_type().is_none());
        assert!(part.file_name().is_none());
    }

    #[test]
    fn part_bytes() {
        let part = Part::bytes("data", vec![1, 2, 3]);
        assert_eq!(part.data().as_ref(), &[1, 2, 3]);
        assert_eq!(part.media_type(), Some(&MediaType::OCTET_STREAM));
    }

    #[test]
    fn part_file_guesses_media_type() {
        let part = Part::file("upload", "photo.jpg", vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(part.file_name(), Some("photo.jpg"));
        assert_eq!(
            part.media_type(),
            Some(&MediaType::Image(ImageSubtype::Jpeg))
        );

        let part = Part::file("upload", "blob.xyz", vec![0]);
        assert_eq!(part.media_type(), Some(&MediaType::OCTET_STREAM));
    }

    #[test]
    fn part_with_modifiers() {
        let part = Part::new("field", "data")
            .with_name("renamed")
            .with_file_name("custom.bin")
            .with_media_type("application/zip");
        assert_eq!(part.name(), "renamed");
        assert_eq!(part.file_name(), Some("custom.bin"));
        assert_eq!(
            part.media_type(),
            Some(&MediaType::Application(ApplicationSubtype::Zip))
        );
    }

    #[test]
    fn part_header_minimal() {
        let part = Part::text("a[b]", "1");
        assert_eq!(
            rendered(&part),
            "Content-Disposition: form-data; name=\"a[b]\"\r\n\r\n1"
        );
    }

    #[test]
    fn part_header_with_file_and_media_type() {
        let part = Part::file("upload", "notes.txt", "hi");
        assert_eq!(
            rendered(&part),
            "Content-Disposition: form-data; name=\"upload\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nhi"
        );
    }

    #[test]
    fn part_header_escapes_quotes_and_newlines() {
        let part = Part::new("say \"hi\"", "x").with_file_name("a\r\nb.txt");
        let header = rendered(&part);
        assert!(header.contains("name=\"say %22hi%22\""));
        assert!(header.contains("filename=\"a%0D%0Ab.txt\""));
    }

    #[test]
    fn part_header_rejects_unsafe_media_type() {
        let part = Part::new("f", "x").with_media_type("text/plain\r\nX-Injected: 1");
        let mut buf = BytesMut::new();
        assert_eq!(
            part.write_to(&mut buf),
            Err(MultipartEncodingError::HeaderEncoding)
        );

        let part = Part::new("f", "x").with_media_type("text/plaîn");
        assert_eq!(
            part.write_to(&mut buf),
            Err(MultipartEncodingError::HeaderEncoding)
        );
    }

    #[test]
    fn boundary_generate_format() {
        let boundary = Boundary::generate();
        let value = boundary.value();
        let random = value
            .strip_prefix("parcel.boundary.")
            .expect("fixed prefix");
        assert_eq!(random.len(), 16);
        assert!(random.bytes().all(|b| b.is_ascii_hexdigit()));
        assert!(boundary.is_valid());
    }

    #[test]
    fn boundary_markers() {
        let boundary = Boundary::new("xyz");
        assert_eq!(boundary.initial().expect("initial").as_ref(), b"--xyz\r\n");
        assert_eq!(
            boundary.encapsulated().expect("encapsulated").as_ref(),
            b"\r\n--xyz\r\n"
        );
        assert_eq!(
            boundary.final_marker().expect("final").as_ref(),
            b"\r\n--xyz--\r\n"
        );
    }

    #[test]
    fn boundary_invalid_has_no_markers() {
        let too_long = "x".repeat(71);
        for value in ["", "trailing ", "new\nline", too_long.as_str()] {
            let boundary = Boundary::new(value);
            assert!(!boundary.is_valid(), "{value:?} should be invalid");
            assert!(boundary.initial().is_none());
            assert!(boundary.encapsulated().is_none());
            assert!(boundary.final_marker().is_none());
        }
    }
}
