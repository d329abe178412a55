//! Encode nested request parameters as query strings, form, JSON or
//! multipart bodies.
//!
//! Parcel builds requests; it does not send them. Plug any transport in
//! through [`HttpClient`] and drive it with a [`Client`].
//!
//! # Example
//!
//! ```
//! use parcel::prelude::*;
//!
//! #[derive(Parameters)]
//! #[parameters(rename_all = "camelCase")]
//! struct Search {
//!     query: String,
//!     page_size: u32,
//!     cursor: Option<String>,
//! }
//!
//! let search = Search { query: "rust".into(), page_size: 20, cursor: None };
//! let request = Request::builder(Method::Get, "https://api.example.com/search")
//!     .parameters(&search)
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(
//!     request.url().as_str(),
//!     "https://api.example.com/search?query=rust&pageSize=20"
//! );
//! ```

mod client;
mod config;
pub mod prelude;

pub use client::{Client, PendingRequest};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export core types
pub use parcel_core::{
    ApplicationSubtype, Boundary, CONTENT_TYPE, ContentType, Encoded, Encoder, Encoding, Error,
    HttpClient, ImageSubtype, JsonEncoding, MediaType, Method, MultipartEncoding,
    MultipartEncodingError, Pair, ParameterValue, Parameters, Part, Request, RequestBuilder,
    Response, Result, Scalar, TextSubtype, ToParameterValue, ToParameters, UrlEncoding,
    UrlEncodingError, UrlFormatError, UrlMode, encode_json, encode_multipart, encode_query,
    flatten, flatten_all, params, parse_url,
};

// Re-export crates used in public signatures
pub use bytes;
pub use url;

// Re-export macros
pub use parcel_macro::Parameters;
