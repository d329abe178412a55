//! Content types set by the encoders.

use crate::Boundary;

/// Name of the header every encoder writes.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Content type of an encoded request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type, always declared as UTF-8.
    FormUrlEncoded,
    /// Multipart content type, without its boundary parameter.
    MultipartFormData,
}

impl ContentType {
    /// Get the header value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded; charset=utf-8",
            Self::MultipartFormData => "multipart/form-data",
        }
    }

    /// Header value for a multipart body delimited by `boundary`.
    ///
    /// The boundary is quoted when it contains characters that are not
    /// allowed in a header token.
    #[must_use]
    pub fn multipart(boundary: &Boundary) -> String {
        let value = boundary.value();
        let multipart = Self::MultipartFormData.as_str();
        if value.bytes().all(is_token_char) {
            format!("{multipart}; boundary={value}")
        } else {
            format!("{multipart}; boundary=\"{value}\"")
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `tchar` from RFC 9110 section 5.6.2.
const fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
