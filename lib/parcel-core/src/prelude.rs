//! Prelude module for convenient imports.
//!
//! ```
//! use parcel_core::prelude::*;
//!
//! let request = Request::builder(Method::Get, "https://example.com")
//!     .parameters(params! { "q" => "rust" })
//!     .build();
//! assert!(request.is_ok());
//! ```

pub use crate::{
    Encoder, Encoding, Error, HttpClient, JsonEncoding, MediaType, Method, MultipartEncoding,
    ParameterValue, Parameters, Part, Request, RequestBuilder, Response, Result, ToParameterValue,
    ToParameters, UrlEncoding, params,
};
