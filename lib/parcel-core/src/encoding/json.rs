//! JSON body encoding.

use bytes::Bytes;
use tracing::debug;
use url::Url;

use super::{Encoded, Encoder, non_empty};
use crate::body::{CONTENT_TYPE, ContentType};
use crate::{Error, Method, Parameters, Result};

/// JSON encoding of the unflattened parameters.
///
/// Parameters always go in the body, whatever the method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonEncoding {
    pretty: bool,
}

impl JsonEncoding {
    /// Compact output.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed output.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Returns `true` if output is pretty-printed.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Encoder for JsonEncoding {
    fn encode(
        &self,
        method: Method,
        url: &Url,
        parameters: Option<&Parameters>,
    ) -> Result<Encoded> {
        let Some(parameters) = non_empty(parameters) else {
            return Ok(Encoded::new());
        };

        debug!(%method, %url, encoding = "json", placement = "body", "encoding parameters");
        let body = if self.pretty {
            serde_json::to_vec_pretty(parameters).map_err(Error::JsonEncoding)?
        } else {
            serde_json::to_vec(parameters).map_err(Error::JsonEncoding)?
        };

        Ok(Encoded::new()
            .with_header(CONTENT_TYPE, ContentType::Json.as_str())
            .with_body(body))
    }
}

/// Serialize parameters as a compact JSON object.
///
/// Returns `None` for empty parameters, which produce no body.
///
/// ```
/// use parcel_core::{Parameters, encode_json, params};
///
/// let body = encode_json(&params! { "p1" => 1 }).expect("encodable");
/// assert_eq!(body.as_deref(), Some(&br#"{"p1":1}"#[..]));
/// assert_eq!(encode_json(&Parameters::new()).expect("empty"), None);
/// ```
///
/// # Errors
///
/// Returns [`Error::JsonEncoding`] if serialization fails, which happens
/// for attachments and non-finite numbers.
pub fn encode_json(parameters: &Parameters) -> Result<Option<Bytes>> {
    if parameters.is_empty() {
        return Ok(None);
    }
    let body = serde_json::to_vec(parameters)?;
    Ok(Some(Bytes::from(body)))
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::{Part, params};

    fn url() -> Url {
        Url::parse("https://example.com/items").expect("valid URL")
    }

    #[test]
    fn json_is_exact() {
        let encoded = JsonEncoding::new()
            .encode(Method::Post, &url(), Some(&params! { "p1" => 1 }))
            .expect("encode");

        check!(encoded.body().map(|body| &body[..]) == Some(&br#"{"p1":1}"#[..]));
        check!(encoded.header(CONTENT_TYPE) == Some("application/json"));
        check!(encoded.url().is_none());
    }

    #[test]
    fn json_keeps_nesting_and_order() {
        let body = encode_json(&params! {
            "z" => params! { "tags" => vec!["a"], "n" => 1.5 },
            "a" => true,
        })
        .expect("encode");
        check!(body.as_deref() == Some(&br#"{"z":{"tags":["a"],"n":1.5},"a":true}"#[..]));
    }

    #[test]
    fn single_element_array_is_kept() {
        let body = encode_json(&params! { "ids" => [7] }).expect("encode");
        check!(body.as_deref() == Some(&br#"{"ids":[7]}"#[..]));
    }

    #[test]
    fn json_goes_in_body_for_get() {
        let encoded = JsonEncoding::new()
            .encode(Method::Get, &url(), Some(&params! { "a" => "b" }))
            .expect("encode");
        check!(encoded.body().is_some());
        check!(encoded.url().is_none());
    }

    #[test]
    fn pretty_output() {
        let encoded = JsonEncoding::pretty()
            .encode(Method::Post, &url(), Some(&params! { "a" => 1 }))
            .expect("encode");
        let body = encoded.body().expect("body");
        check!(&body[..] == b"{\n  \"a\": 1\n}");
    }

    #[test]
    fn empty_parameters_are_a_no_op() {
        let encoded = JsonEncoding::new()
            .encode(Method::Post, &url(), Some(&Parameters::new()))
            .expect("encode");
        check!(encoded.is_empty());

        let encoded = JsonEncoding::new().encode(Method::Post, &url(), None).expect("encode");
        check!(encoded.is_empty());

        let_assert!(Ok(None) = encode_json(&Parameters::new()));
    }

    #[test]
    fn non_finite_numbers_fail() {
        let_assert!(Err(Error::JsonEncoding(_)) = encode_json(&params! { "x" => f64::NAN }));
        let_assert!(
            Err(Error::JsonEncoding(reason)) = JsonEncoding::new().encode(
                Method::Post,
                &url(),
                Some(&params! { "y" => params! { "z" => f64::INFINITY } })
            )
        );
        check!(reason.to_string().contains("non-finite number"));
    }

    #[test]
    fn attachment_fails_with_reason() {
        let parameters = params! { "avatar" => Part::bytes("avatar", vec![1_u8]) };
        let_assert!(
            Err(Error::JsonEncoding(reason)) =
                JsonEncoding::new().encode(Method::Post, &url(), Some(&parameters))
        );
        check!(reason.to_string().contains("avatar"));
    }
}
