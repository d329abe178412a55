//! Request assembly.
//!
//! [`Request::builder`] takes the method, a URL string, parameters and an
//! [`Encoding`]; [`RequestBuilder::build`] validates the URL, runs the
//! encoder and merges the headers.
//!
//! # Example
//!
//! ```
//! use parcel_core::{Encoding, Method, Request, params};
//!
//! let request = Request::builder(Method::Post, "https://api.example.com/users")
//!     .parameters(params! { "name" => "Ada" })
//!     .encoding(Encoding::json())
//!     .header("Accept", "application/json")
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(request.header("content-type"), Some("application/json"));
//! assert_eq!(request.body().map(|body| &body[..]), Some(&br#"{"name":"Ada"}"#[..]));
//! ```

use std::collections::HashMap;

use bytes::Bytes;
use tracing::debug;
use url::{ParseError, Url};

use crate::error::UrlFormatError;
use crate::{Encoder, Encoding, Method, Parameters, Result, ToParameters};

/// An encoded HTTP request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// Reassemble a request from its parts, without encoding anything.
    #[must_use]
    pub fn from_parts(
        method: Method,
        url: Url,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL, including any encoded query.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Consume into (method, url, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Url, HashMap<String, String>, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    parameters: Option<Parameters>,
    encoding: Encoding,
    headers: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Creates a new builder with the default URL encoding.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            parameters: None,
            encoding: Encoding::default(),
            headers: Vec::new(),
        }
    }

    /// Sets the parameters to encode.
    #[must_use]
    pub fn parameters(mut self, parameters: impl ToParameters) -> Self {
        self.parameters = Some(parameters.to_parameters());
        self
    }

    /// Sets the encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<Encoding>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Sets a header. A later value for the same name wins.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    /// Validate the URL, encode the parameters and merge headers.
    ///
    /// Headers set by the encoder replace caller headers with the same
    /// name (compared ignoring ASCII case).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UrlFormat`](crate::Error::UrlFormat) for a malformed
    /// URL, before anything is encoded, or the encoder's error unchanged.
    pub fn build(self) -> Result<Request> {
        let url = parse_url(&self.url)?;

        debug!(
            method = %self.method,
            %url,
            encoding = self.encoding.name(),
            "building request"
        );
        let encoded = self
            .encoding
            .encode(self.method, &url, self.parameters.as_ref())?;
        let (body, encoder_headers, encoded_url) = encoded.into_parts();

        let mut headers = HashMap::with_capacity(self.headers.len() + encoder_headers.len());
        for (name, value) in self.headers.into_iter().chain(encoder_headers) {
            set_header(&mut headers, name, value);
        }

        Ok(Request {
            method: self.method,
            url: encoded_url.unwrap_or(url),
            headers,
            body,
        })
    }
}

/// Insert a header, replacing any existing one with the same name.
fn set_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Parse and validate a request URL.
///
/// The URL must be ASCII, absolute and have a host.
///
/// ```
/// use parcel_core::{Error, UrlFormatError, parse_url};
///
/// assert!(parse_url("https://example.com/a?b=c").is_ok());
/// assert!(matches!(
///     parse_url("apple.com"),
///     Err(Error::UrlFormat(UrlFormatError::NoSchemeProvided))
/// ));
/// ```
///
/// # Errors
///
/// Returns [`UrlFormatError::InvalidUrl`] for a string that is not a URL,
/// [`UrlFormatError::NoSchemeProvided`] when the scheme is missing and
/// [`UrlFormatError::NoHostProvided`] when the host is missing.
pub fn parse_url(input: &str) -> Result<Url> {
    if input.is_empty() || !input.is_ascii() {
        return Err(UrlFormatError::InvalidUrl.into());
    }

    let url = Url::parse(input).map_err(|err| match err {
        ParseError::RelativeUrlWithoutBase => UrlFormatError::NoSchemeProvided,
        ParseError::EmptyHost => UrlFormatError::NoHostProvided,
        _ => UrlFormatError::InvalidUrl,
    })?;

    if url.host().is_none() {
        return Err(UrlFormatError::NoHostProvided.into());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{Error, Part, params};

    #[test]
    fn url_validation() {
        use UrlFormatError::{InvalidUrl, NoHostProvided, NoSchemeProvided};

        let_assert!(Err(Error::UrlFormat(InvalidUrl)) = parse_url("http://💩.com"));
        let_assert!(Err(Error::UrlFormat(NoSchemeProvided)) = parse_url("apple.com"));
        let_assert!(Err(Error::UrlFormat(NoHostProvided)) = parse_url("http://"));
        let_assert!(Err(Error::UrlFormat(NoHostProvided)) = parse_url("http://?asd=asd"));
        let_assert!(Err(Error::UrlFormat(NoHostProvided)) = parse_url("file:///etc/hosts"));
        let_assert!(Err(Error::UrlFormat(InvalidUrl)) = parse_url(""));
        let_assert!(Err(Error::UrlFormat(InvalidUrl)) = parse_url("http://exa mple.com"));

        let_assert!(Ok(url) = parse_url("http://localhost:8080/path?x=1"));
        check!(url.port() == Some(8080));
    }

    #[test]
    fn get_moves_parameters_to_query() {
        let request = Request::builder(Method::Get, "https://api.example.com/search")
            .parameters(params! { "q" => "rust", "tags" => ["a", "b"] })
            .build()
            .expect("build");

        check!(
            request.url().as_str()
                == "https://api.example.com/search?q=rust&tags%5B%5D=a&tags%5B%5D=b"
        );
        check!(request.body().is_none());
        check!(request.headers().is_empty());
    }

    #[test]
    fn post_moves_parameters_to_body() {
        let request = Request::builder(Method::Post, "https://api.example.com/users")
            .parameters(params! { "name" => "Ada" })
            .build()
            .expect("build");

        check!(request.url().as_str() == "https://api.example.com/users");
        check!(request.body().map(|body| &body[..]) == Some(&b"name=Ada"[..]));
        check!(
            request.header("Content-Type") == Some("application/x-www-form-urlencoded; charset=utf-8")
        );
    }

    #[test]
    fn encoder_owns_content_type() {
        let request = Request::builder(Method::Post, "https://api.example.com/users")
            .parameters(params! { "name" => "Ada" })
            .encoding(Encoding::json())
            .header("content-type", "text/plain")
            .header("X-Trace", "abc")
            .build()
            .expect("build");

        check!(request.headers().len() == 2);
        check!(request.header("Content-Type") == Some("application/json"));
        check!(request.header("x-trace") == Some("abc"));
    }

    #[test]
    fn caller_content_type_kept_when_encoder_sets_none() {
        let request = Request::builder(Method::Post, "https://api.example.com/raw")
            .encoding(Encoding::json())
            .headers([("Content-Type", "text/csv")])
            .build()
            .expect("build");

        check!(request.header("content-type") == Some("text/csv"));
        check!(request.body().is_none());
    }

    #[test]
    fn later_caller_header_wins() {
        let request = Request::builder(Method::Get, "https://api.example.com")
            .header("Accept", "text/html")
            .header("ACCEPT", "application/json")
            .build()
            .expect("build");

        check!(request.headers().len() == 1);
        check!(request.header("accept") == Some("application/json"));
    }

    #[test]
    fn invalid_url_is_reported_before_encoding() {
        let parameters = params! { "file" => Part::bytes("file", vec![1_u8]) };
        let_assert!(
            Err(Error::UrlFormat(UrlFormatError::NoSchemeProvided)) =
                Request::builder(Method::Get, "apple.com").parameters(parameters).build()
        );
    }

    #[test]
    fn encoder_error_is_returned_unchanged() {
        let parameters = params! { "file" => Part::bytes("file", vec![1_u8]) };
        let_assert!(
            Err(Error::UnsupportedAttachment { key }) =
                Request::builder(Method::Get, "https://example.com").parameters(parameters).build()
        );
        check!(key == "file");
    }

    #[test]
    fn request_into_parts_and_back() {
        let request = Request::builder(Method::Delete, "https://example.com/items/1")
            .header("X-Id", "1")
            .build()
            .expect("build");
        let (method, url, headers, body) = request.clone().into_parts();
        check!(Request::from_parts(method, url, headers, body) == request);
    }
}
