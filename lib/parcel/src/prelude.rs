//! Prelude module for convenient imports.
//!
//! ```ignore
//! use parcel::prelude::*;
//! ```

pub use crate::{
    Client, ClientConfig, Encoder, Encoding, Error, HttpClient, JsonEncoding, MediaType, Method,
    MultipartEncoding, ParameterValue, Parameters, Part, Request, RequestBuilder, Response, Result,
    ToParameterValue, ToParameters, UrlEncoding, params,
};
