//! Parameter encoding engine for parcel.
//!
//! This crate turns a nested parameter structure into a request:
//! - [`Parameters`], [`ParameterValue`] and [`Scalar`] - the parameter model
//! - [`flatten`] - bracket-suffix flattening into `(key, value)` pairs
//! - [`UrlEncoding`], [`JsonEncoding`] and [`MultipartEncoding`] - the codecs
//! - [`Encoding`] and [`Encoder`] - codec selection and the custom-codec seam
//! - [`Request`] and [`RequestBuilder`] - URL validation, encoding and header merge
//! - [`Part`], [`Boundary`] and [`MediaType`] - multipart building blocks
//! - [`HttpClient`] and [`Response`] - the transport seam
//! - [`Error`] and [`Result`] - error handling

mod body;
mod client;
mod encoding;
mod error;
mod flatten;
mod method;
mod mime;
mod multipart;
pub mod prelude;
mod request;
mod response;
mod value;

pub use body::{CONTENT_TYPE, ContentType};
pub use client::HttpClient;
pub use encoding::{
    Encoded, Encoder, Encoding, JsonEncoding, MultipartEncoding, UrlEncoding, UrlMode,
    encode_json, encode_multipart, encode_query,
};
pub use error::{Error, MultipartEncodingError, Result, UrlEncodingError, UrlFormatError};
pub use flatten::{Pair, flatten, flatten_all};
pub use method::Method;
pub use mime::{ApplicationSubtype, ImageSubtype, MediaType, TextSubtype};
pub use multipart::{Boundary, Part};
pub use request::{Request, RequestBuilder, parse_url};
pub use response::Response;
pub use value::{ParameterValue, Parameters, Scalar, ToParameterValue, ToParameters};
