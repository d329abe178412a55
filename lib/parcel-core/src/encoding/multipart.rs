//! `multipart/form-data` body encoding.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};
use url::Url;

use super::{Encoded, Encoder};
use crate::body::{CONTENT_TYPE, ContentType};
use crate::error::MultipartEncodingError;
use crate::flatten::flatten_with_attachments;
use crate::{Boundary, Method, Parameters, Part, Result};

/// Multipart encoding of the parameters plus explicit attachments.
///
/// Parts are written in this order: one text part per flattened parameter,
/// then attachments found inside the parameters (named by their bracketed
/// key), then the explicit attachments.
///
/// # Example
///
/// ```
/// use parcel_core::{Encoder, Method, MultipartEncoding, Part, params};
///
/// let url = url::Url::parse("https://example.com/upload").expect("valid URL");
/// let encoding = MultipartEncoding::new([Part::file("doc", "notes.txt", "hello")])
///     .with_boundary("XyZ");
/// let encoded = encoding
///     .encode(Method::Post, &url, Some(&params! { "title" => "Notes" }))
///     .expect("encode");
///
/// assert_eq!(
///     encoded.header("Content-Type"),
///     Some("multipart/form-data; boundary=XyZ")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartEncoding {
    parts: Vec<Part>,
    boundary: Option<String>,
}

impl MultipartEncoding {
    /// Creates a multipart encoding with explicit attachments.
    #[must_use]
    pub fn new(parts: impl IntoIterator<Item = Part>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
            boundary: None,
        }
    }

    /// Appends an explicit attachment.
    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Uses a fixed boundary value instead of a random one.
    ///
    /// The value must not occur inside any part.
    #[must_use]
    pub fn with_boundary(mut self, boundary: impl Into<String>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Explicit attachments.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn boundary(&self) -> Boundary {
        self.boundary
            .as_ref()
            .map_or_else(Boundary::generate, |value| Boundary::new(value.clone()))
    }
}

impl Encoder for MultipartEncoding {
    fn encode(
        &self,
        method: Method,
        url: &Url,
        parameters: Option<&Parameters>,
    ) -> Result<Encoded> {
        debug!(%method, %url, encoding = "multipart", placement = "body", "encoding parameters");

        let parts = collect_parts(parameters, &self.parts)?;
        if parts.is_empty() {
            return Ok(Encoded::new()
                .with_header(CONTENT_TYPE, ContentType::MultipartFormData.as_str()));
        }

        let boundary = self.boundary();
        let body = write_body(&parts, &boundary)?;
        Ok(Encoded::new()
            .with_header(CONTENT_TYPE, ContentType::multipart(&boundary))
            .with_body(body))
    }
}

/// Build a multipart body from the parameters and explicit attachments.
///
/// Returns the body with the boundary delimiting it, or `None` when there
/// is no part at all.
///
/// # Errors
///
/// Returns [`Error::MultipartEncoding`](crate::Error::MultipartEncoding) if
/// a part header cannot be written.
pub fn encode_multipart(
    parameters: Option<&Parameters>,
    attachments: &[Part],
) -> Result<Option<(Bytes, Boundary)>> {
    let parts = collect_parts(parameters, attachments)?;
    if parts.is_empty() {
        return Ok(None);
    }

    let boundary = Boundary::generate();
    let body = write_body(&parts, &boundary)?;
    Ok(Some((body, boundary)))
}

fn collect_parts(parameters: Option<&Parameters>, attachments: &[Part]) -> Result<Vec<Part>> {
    let mut parts = Vec::new();
    if let Some(parameters) = parameters {
        let (pairs, found) = flatten_with_attachments(parameters)?;
        parts.extend(pairs.into_iter().map(|(key, value)| Part::text(key, value)));
        parts.extend(found);
    }
    parts.extend(attachments.iter().cloned());
    Ok(parts)
}

fn write_body(parts: &[Part], boundary: &Boundary) -> Result<Bytes> {
    trace!(parts = parts.len(), boundary = boundary.value(), "writing multipart body");

    let mut buf = BytesMut::new();
    for (index, part) in parts.iter().enumerate() {
        let marker = if index == 0 {
            boundary.initial()
        } else {
            boundary.encapsulated()
        };
        buf.put_slice(&marker.ok_or(MultipartEncodingError::NoBoundary)?);
        part.write_to(&mut buf)?;
    }

    let final_marker = boundary
        .final_marker()
        .ok_or(MultipartEncodingError::NoBoundary)?;
    buf.put_slice(&final_marker);

    Ok(buf.freeze())
}
