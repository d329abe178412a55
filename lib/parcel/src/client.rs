//! Client that encodes requests and hands them to a transport.

use std::time::Instant;

use parcel_core::{
    Encoding, Error, HttpClient, Method, Request, RequestBuilder, Response, Result, ToParameters,
};
use tracing::{Instrument, Level, info, span, warn};

use crate::config::ClientConfig;

/// Applies [`ClientConfig`] defaults to requests and sends them through a
/// transport.
///
/// # Example
///
/// ```ignore
/// use parcel::{Client, params};
///
/// let client = Client::new(transport);
/// let response = client
///     .post("https://api.example.com/users")
///     .parameters(params! { "name" => "Ada" })
///     .send()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: HttpClient> Client<T> {
    /// Creates a client with the default configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    #[must_use]
    pub const fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Start a request.
    ///
    /// The configured `User-Agent`, default headers and default encoding
    /// apply unless the request overrides them.
    pub fn request(&self, method: Method, url: impl Into<String>) -> PendingRequest<'_, T> {
        let mut builder =
            RequestBuilder::new(method, url).encoding(self.config.default_encoding.clone());
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.header("User-Agent", user_agent.clone());
        }
        builder = builder.headers(
            self.config
                .default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        PendingRequest {
            client: self,
            builder,
        }
    }

    /// Start a `GET` request.
    pub fn get(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Get, url)
    }

    /// Start a `HEAD` request.
    pub fn head(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Head, url)
    }

    /// Start a `POST` request.
    pub fn post(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Post, url)
    }

    /// Start a `PUT` request.
    pub fn put(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Put, url)
    }

    /// Start a `PATCH` request.
    pub fn patch(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Patch, url)
    }

    /// Start a `DELETE` request.
    pub fn delete(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Delete, url)
    }

    /// Start an `OPTIONS` request.
    pub fn options(&self, url: impl Into<String>) -> PendingRequest<'_, T> {
        self.request(Method::Options, url)
    }

    /// Send an already built request through the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the transport does not answer within the
    /// configured timeout, or the transport error unchanged.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method();
        let url = request.url().to_string();
        let span = span!(Level::INFO, "http_request", %method, %url);

        async move {
            let start = Instant::now();
            info!(method = %method, url = %url, "sending request");

            let result = tokio::time::timeout(self.config.timeout, self.transport.execute(request))
                .await
                .map_err(|_| Error::Timeout)
                .and_then(|result| result);

            // Saturating conversion to u64
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match &result {
                Ok(response) => {
                    let status = response.status();
                    if response.is_success() {
                        info!(status, elapsed_ms, "request completed");
                    } else {
                        warn!(status, elapsed_ms, "request failed with HTTP error");
                    }
                }
                Err(err) => {
                    warn!(error = %err, elapsed_ms, "request failed");
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// A request being configured on a [`Client`].
#[derive(Debug)]
#[must_use = "a pending request does nothing until sent"]
pub struct PendingRequest<'a, T> {
    client: &'a Client<T>,
    builder: RequestBuilder,
}

impl<T: HttpClient> PendingRequest<'_, T> {
    /// Sets the parameters to encode.
    pub fn parameters(mut self, parameters: impl ToParameters) -> Self {
        self.builder = self.builder.parameters(parameters);
        self
    }

    /// Sets the encoding, replacing the configured default.
    pub fn encoding(mut self, encoding: impl Into<Encoding>) -> Self {
        self.builder = self.builder.encoding(encoding);
        self
    }

    /// Sets a header, replacing a default header with the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets multiple headers.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.headers(headers);
        self
    }

    /// Encode the request without sending it.
    ///
    /// # Errors
    ///
    /// Returns the URL or encoding error.
    pub fn build(self) -> Result<Request> {
        self.builder.build()
    }

    /// Encode the request and send it.
    ///
    /// Encoding errors are returned before the transport is called.
    ///
    /// # Errors
    ///
    /// Returns the URL or encoding error, [`Error::Timeout`], or the
    /// transport error.
    pub async fn send(self) -> Result<Response> {
        let client = self.client;
        let request = self.builder.build()?;
        client.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;

    use super::*;

    struct NoopTransport;

    impl HttpClient for NoopTransport {
        fn execute(&self, _request: Request) -> impl Future<Output = Result<Response>> + Send {
            async { Ok(Response::new(200, HashMap::new(), "")) }
        }
    }

    #[test]
    fn request_applies_defaults() {
        let config = ClientConfig::builder()
            .user_agent("tests/1")
            .default_header("Accept", "application/json")
            .build();
        let client = Client::with_config(NoopTransport, config);

        let request = client.get("https://example.com").build().expect("build");

        assert_eq!(request.header("user-agent"), Some("tests/1"));
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn request_header_overrides_default() {
        let client = Client::new(NoopTransport);
        let request = client
            .get("https://example.com")
            .header("user-agent", "custom")
            .build()
            .expect("build");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("User-Agent"), Some("custom"));
    }
}
