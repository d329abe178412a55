//! Transport seam.
//!
//! Parcel only builds requests. Sending them is the job of an [`HttpClient`]
//! implementation supplied by the caller.

use std::future::Future;

use crate::{Request, Response, Result};

/// Executes encoded requests.
///
/// Implementations own connections, TLS, redirects and retries. A request
/// reaching `execute` is complete and immutable, so it can be moved to
/// another task or thread.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::future::Future;
///
/// use bytes::Bytes;
/// use parcel_core::{HttpClient, Request, Response, Result};
///
/// struct Echo;
///
/// impl HttpClient for Echo {
///     fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
///         let body = request.body().cloned().unwrap_or_default();
///         async move { Ok(Response::new(200, HashMap::new(), body)) }
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Send a request and return the response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) or
    /// [`Error::Timeout`](crate::Error::Timeout) if the request could not be
    /// delivered.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}
