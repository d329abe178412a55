//! URL encoding: query string or form body.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;
use url::Url;

use super::{Encoded, Encoder, non_empty};
use crate::body::{CONTENT_TYPE, ContentType};
use crate::error::UrlEncodingError;
use crate::{Method, Parameters, Result, flatten};

/// Characters escaped in query keys and values.
///
/// Everything except the RFC 3986 unreserved set, so `[`, `]`, `=`, `&`
/// and space are always escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Where URL-encoded parameters go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UrlMode {
    /// Query for `GET` and `HEAD`, body for every other method.
    #[default]
    Default,
    /// Always in the URL query.
    Query,
    /// Always in the request body.
    Body,
}

/// URL encoding with a placement mode.
///
/// # Example
///
/// ```
/// use parcel_core::{Encoder, Method, UrlEncoding, params};
///
/// let url = url::Url::parse("https://example.com/search?stale=1").expect("valid URL");
/// let encoded = UrlEncoding::default()
///     .encode(Method::Get, &url, Some(&params! { "q" => "a b" }))
///     .expect("encode");
///
/// assert_eq!(
///     encoded.url().map(url::Url::as_str),
///     Some("https://example.com/search?q=a%20b")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UrlEncoding {
    mode: UrlMode,
}

impl UrlEncoding {
    /// Creates a URL encoding with the given mode.
    #[must_use]
    pub const fn new(mode: UrlMode) -> Self {
        Self { mode }
    }

    /// Always encode into the URL query.
    #[must_use]
    pub const fn query() -> Self {
        Self::new(UrlMode::Query)
    }

    /// Always encode into the request body.
    #[must_use]
    pub const fn body() -> Self {
        Self::new(UrlMode::Body)
    }

    /// Placement mode.
    #[must_use]
    pub const fn mode(&self) -> UrlMode {
        self.mode
    }

    /// Returns `true` if parameters for `method` go in the URL query.
    #[must_use]
    pub const fn should_encode_in_query(&self, method: Method) -> bool {
        match self.mode {
            UrlMode::Query => true,
            UrlMode::Body => false,
            UrlMode::Default => method.prefers_query(),
        }
    }
}

impl Encoder for UrlEncoding {
    fn encode(
        &self,
        method: Method,
        url: &Url,
        parameters: Option<&Parameters>,
    ) -> Result<Encoded> {
        let Some(parameters) = non_empty(parameters) else {
            return Ok(Encoded::new());
        };

        let query = encode_query(parameters)?;
        if self.should_encode_in_query(method) {
            debug!(%method, %url, encoding = "url", placement = "query", "encoding parameters");
            let url = replace_query(url, &query)?;
            Ok(Encoded::new().with_url(url))
        } else {
            debug!(%method, %url, encoding = "url", placement = "body", "encoding parameters");
            Ok(Encoded::new()
                .with_header(CONTENT_TYPE, ContentType::FormUrlEncoded.as_str())
                .with_body(query))
        }
    }
}

/// Encode parameters as `key=value` pairs joined with `&`.
///
/// Keys and values are escaped separately before `=` is inserted.
///
/// ```
/// use parcel_core::{encode_query, params};
///
/// let query = encode_query(&params! { "a" => [1, 2] }).expect("no attachments");
/// assert_eq!(query, "a%5B%5D=1&a%5B%5D=2");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedAttachment`](crate::Error::UnsupportedAttachment)
/// if the parameters contain an attachment.
pub fn encode_query(parameters: &Parameters) -> Result<String> {
    let pairs = flatten(parameters)?
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>();
    Ok(pairs.join("&"))
}

/// Replace the query component of `url`, keeping everything else.
fn replace_query(url: &Url, query: &str) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(UrlEncodingError::NoComponentsFromUrl.into());
    }

    let mut components = url.clone();
    components.set_query((!query.is_empty()).then_some(query));

    Url::parse(components.as_str()).map_err(|_| UrlEncodingError::NoUrlFromComponents.into())
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{Error, Part, params};

    fn url(value: &str) -> Url {
        Url::parse(value).expect("valid URL")
    }

    #[test]
    fn placement_table() {
        let default = UrlEncoding::default();
        check!(default.should_encode_in_query(Method::Get));
        check!(default.should_encode_in_query(Method::Head));
        check!(!default.should_encode_in_query(Method::Post));
        check!(!default.should_encode_in_query(Method::Delete));

        for method in [Method::Get, Method::Post, Method::Put] {
            check!(UrlEncoding::query().should_encode_in_query(method));
            check!(!UrlEncoding::body().should_encode_in_query(method));
        }
    }

    #[test]
    fn query_contains_every_pair() {
        let query = encode_query(&params! { "a" => 1, "b" => 2 }).expect("encode");
        let pairs: Vec<_> = query.split('&').collect();
        check!(pairs.len() == 2);
        check!(pairs.contains(&"a=1"));
        check!(pairs.contains(&"b=2"));
    }

    #[test]
    fn query_escapes_reserved_characters() {
        let query = encode_query(&params! {
            "filter" => params! { "name" => "a&b=c d" },
            "tilde~ok" => "-._~",
        })
        .expect("encode");
        check!(query == "filter%5Bname%5D=a%26b%3Dc%20d&tilde~ok=-._~");
    }

    #[test]
    fn query_escapes_non_ascii_as_utf8() {
        let query = encode_query(&params! { "city" => "Zürich" }).expect("encode");
        check!(query == "city=Z%C3%BCrich");
    }

    #[test]
    fn get_places_parameters_in_query() {
        let encoded = UrlEncoding::default()
            .encode(Method::Get, &url("https://example.com/path"), Some(&params! { "a" => [1, 2] }))
            .expect("encode");

        check!(encoded.body().is_none());
        check!(encoded.headers().is_empty());
        check!(
            encoded.url().map(Url::as_str) == Some("https://example.com/path?a%5B%5D=1&a%5B%5D=2")
        );
    }

    #[test]
    fn query_placement_replaces_existing_query_only() {
        let encoded = UrlEncoding::query()
            .encode(
                Method::Post,
                &url("https://user@example.com:8443/p?old=1#frag"),
                Some(&params! { "new" => 2 }),
            )
            .expect("encode");
        check!(
            encoded.url().map(Url::as_str) == Some("https://user@example.com:8443/p?new=2#frag")
        );
    }

    #[test]
    fn post_places_parameters_in_body() {
        let original = url("https://example.com/path");
        let encoded = UrlEncoding::default()
            .encode(Method::Post, &original, Some(&params! { "a" => 1, "b" => "x y" }))
            .expect("encode");

        check!(encoded.url().is_none());
        check!(encoded.body().map(|body| &body[..]) == Some(&b"a=1&b=x%20y"[..]));
        check!(
            encoded.header(CONTENT_TYPE) == Some("application/x-www-form-urlencoded; charset=utf-8")
        );
    }

    #[test]
    fn empty_parameters_are_a_no_op() {
        let target = url("https://example.com/?keep=1");
        for method in [Method::Get, Method::Post] {
            let encoded = UrlEncoding::default()
                .encode(method, &target, Some(&Parameters::new()))
                .expect("encode");
            check!(encoded.is_empty());

            let encoded = UrlEncoding::default().encode(method, &target, None).expect("encode");
            check!(encoded.is_empty());
        }
    }

    #[test]
    fn attachment_is_rejected() {
        let parameters = params! { "file" => Part::bytes("file", vec![0_u8]) };
        let_assert!(
            Err(Error::UnsupportedAttachment { key }) = UrlEncoding::default().encode(
                Method::Post,
                &url("https://example.com"),
                Some(&parameters)
            )
        );
        check!(key == "file");
    }

    #[test]
    fn url_without_components_is_rejected() {
        let_assert!(
            Err(Error::UrlEncoding(UrlEncodingError::NoComponentsFromUrl)) = UrlEncoding::query()
                .encode(
                    Method::Get,
                    &url("mailto:someone@example.com"),
                    Some(&params! { "a" => 1 })
                )
        );
    }
}
