//! Encoders turning parameters into a query string or a request body.
//!
//! - [`UrlEncoding`] - query string or `application/x-www-form-urlencoded` body
//! - [`JsonEncoding`] - `application/json` body
//! - [`MultipartEncoding`] - `multipart/form-data` body
//!
//! [`Encoding`] selects one of them, or a caller-defined [`Encoder`].

mod json;
mod multipart;
mod query;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

pub use self::json::{JsonEncoding, encode_json};
pub use self::multipart::{MultipartEncoding, encode_multipart};
pub use self::query::{UrlEncoding, UrlMode, encode_query};
use crate::{Method, Parameters, Part, Result};

// ============================================================================
// Encoded
// ============================================================================

/// Output of an encoder: what changes on the request.
///
/// An empty value (the [`Default`]) leaves the request untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    body: Option<Bytes>,
    headers: HashMap<String, String>,
    url: Option<url::Url>,
}

impl Encoded {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a header the encoder owns.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces the request URL.
    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Encoded body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Headers set by the encoder.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// URL carrying the encoded query.
    #[must_use]
    pub const fn url(&self) -> Option<&url::Url> {
        self.url.as_ref()
    }

    /// Returns `true` if nothing on the request changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_none() && self.headers.is_empty() && self.url.is_none()
    }

    /// Consume into (body, headers, url).
    #[must_use]
    pub fn into_parts(self) -> (Option<Bytes>, HashMap<String, String>, Option<url::Url>) {
        (self.body, self.headers, self.url)
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Encodes parameters for a request.
///
/// Implementations must not keep state between calls: each call builds its
/// own output, which is safe to send to another thread.
///
/// # Example
///
/// ```
/// use parcel_core::{Encoded, Encoder, Method, Parameters, Result};
///
/// struct PlainText;
///
/// impl Encoder for PlainText {
///     fn encode(
///         &self,
///         _method: Method,
///         _url: &url::Url,
///         parameters: Option<&Parameters>,
///     ) -> Result<Encoded> {
///         let Some(parameters) = parameters.filter(|p| !p.is_empty()) else {
///             return Ok(Encoded::new());
///         };
///         let lines = parcel_core::flatten(parameters)?
///             .into_iter()
///             .map(|(key, value)| format!("{key}: {value}\n"))
///             .collect::<String>();
///         Ok(Encoded::new()
///             .with_header("Content-Type", "text/plain")
///             .with_body(lines))
///     }
/// }
/// ```
pub trait Encoder: Send + Sync {
    /// Encode `parameters` for a `method` request to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be represented by this
    /// encoding.
    fn encode(
        &self,
        method: Method,
        url: &url::Url,
        parameters: Option<&Parameters>,
    ) -> Result<Encoded>;
}

// ============================================================================
// Encoding
// ============================================================================

/// The encoding chosen for a request.
#[derive(Clone)]
pub enum Encoding {
    /// Query string or form body, depending on the mode and method.
    Url(UrlEncoding),
    /// JSON body.
    Json(JsonEncoding),
    /// Multipart body.
    Multipart(MultipartEncoding),
    /// Caller-defined encoder.
    Custom(Arc<dyn Encoder>),
}

impl Encoding {
    /// URL encoding in default mode.
    #[must_use]
    pub const fn url() -> Self {
        Self::Url(UrlEncoding::new(UrlMode::Default))
    }

    /// URL encoding always placed in the query.
    #[must_use]
    pub const fn url_query() -> Self {
        Self::Url(UrlEncoding::query())
    }

    /// URL encoding always placed in the body.
    #[must_use]
    pub const fn url_body() -> Self {
        Self::Url(UrlEncoding::body())
    }

    /// Compact JSON encoding.
    #[must_use]
    pub const fn json() -> Self {
        Self::Json(JsonEncoding::new())
    }

    /// Multipart encoding with explicit attachments.
    #[must_use]
    pub fn multipart(parts: impl IntoIterator<Item = Part>) -> Self {
        Self::Multipart(MultipartEncoding::new(parts))
    }

    /// Caller-defined encoding.
    #[must_use]
    pub fn custom(encoder: impl Encoder + 'static) -> Self {
        Self::Custom(Arc::new(encoder))
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Json(_) => "json",
            Self::Multipart(_) => "multipart",
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::url()
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(encoding) => f.debug_tuple("Url").field(encoding).finish(),
            Self::Json(encoding) => f.debug_tuple("Json").field(encoding).finish(),
            Self::Multipart(encoding) => f.debug_tuple("Multipart").field(encoding).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Encoder for Encoding {
    fn encode(
        &self,
        method: Method,
        url: &url::Url,
        parameters: Option<&Parameters>,
    ) -> Result<Encoded> {
        match self {
            Self::Url(encoding) => encoding.encode(method, url, parameters),
            Self::Json(encoding) => encoding.encode(method, url, parameters),
            Self::Multipart(encoding) => encoding.encode(method, url, parameters),
            Self::Custom(encoder) => encoder.encode(method, url, parameters),
        }
    }
}

impl From<UrlEncoding> for Encoding {
    fn from(encoding: UrlEncoding) -> Self {
        Self::Url(encoding)
    }
}

impl From<JsonEncoding> for Encoding {
    fn from(encoding: JsonEncoding) -> Self {
        Self::Json(encoding)
    }
}

impl From<MultipartEncoding> for Encoding {
    fn from(encoding: MultipartEncoding) -> Self {
        Self::Multipart(encoding)
    }
}

impl From<Arc<dyn Encoder>> for Encoding {
    fn from(encoder: Arc<dyn Encoder>) -> Self {
        Self::Custom(encoder)
    }
}

/// Drop empty parameter sets, which every built-in encoder treats as a no-op.
fn non_empty(parameters: Option<&Parameters>) -> Option<&Parameters> {
    parameters.filter(|parameters| !parameters.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, params};

    struct Failing;

    impl Encoder for Failing {
        fn encode(&self, _: Method, _: &url::Url, _: Option<&Parameters>) -> Result<Encoded> {
            Err(Error::encoding("nope"))
        }
    }

    fn url() -> url::Url {
        url::Url::parse("https://api.example.com/items").expect("valid URL")
    }

    #[test]
    fn default_encoding_is_url() {
        let encoding = Encoding::default();
        assert!(matches!(encoding, Encoding::Url(inner) if inner.mode() == UrlMode::Default));
    }

    #[test]
    fn dispatch_to_codec() {
        let parameters = params! { "p1" => 1 };

        let encoded = Encoding::json()
            .encode(Method::Post, &url(), Some(&parameters))
            .expect("json");
        assert_eq!(encoded.body().map(|body| &body[..]), Some(&b"{\"p1\":1}"[..]));

        let encoded = Encoding::url()
            .encode(Method::Get, &url(), Some(&parameters))
            .expect("url");
        assert_eq!(
            encoded.url().map(url::Url::as_str),
            Some("https://api.example.com/items?p1=1")
        );
    }

    #[test]
    fn custom_encoder_error_is_returned_unchanged() {
        let err = Encoding::custom(Failing)
            .encode(Method::Post, &url(), None)
            .expect_err("custom encoder fails");
        assert!(matches!(err, Error::Encoding(message) if message == "nope"));
    }

    #[test]
    fn encoding_debug_and_name() {
        assert_eq!(format!("{:?}", Encoding::custom(Failing)), "Custom(..)");
        assert_eq!(Encoding::multipart([]).name(), "multipart");
        assert_eq!(Encoding::url_body().name(), "url");
    }

    #[test]
    fn encoded_is_empty() {
        assert!(Encoded::new().is_empty());
        assert!(!Encoded::new().with_body("x").is_empty());
        assert_eq!(
            Encoded::new().with_header("X-A", "1").header("X-A"),
            Some("1")
        );
    }
}
