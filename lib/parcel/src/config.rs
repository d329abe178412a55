//! Client configuration types.

use std::collections::HashMap;
use std::time::Duration;

use parcel_core::Encoding;

/// Configuration for [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Time allowed for the transport to answer.
    pub timeout: Duration,
    /// `User-Agent` header, sent unless a request sets its own.
    pub user_agent: Option<String>,
    /// Headers sent with every request; request headers win.
    pub default_headers: HashMap<String, String>,
    /// Encoding for requests that do not choose one.
    pub default_encoding: Encoding,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: Some(default_user_agent()),
            default_headers: HashMap::new(),
            default_encoding: Encoding::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

fn default_user_agent() -> String {
    format!("parcel/{}", env!("CARGO_PKG_VERSION"))
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
    without_user_agent: bool,
    default_headers: HashMap<String, String>,
    default_encoding: Option<Encoding>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self.without_user_agent = false;
        self
    }

    /// Do not send a `User-Agent` header by default.
    #[must_use]
    pub fn no_user_agent(mut self) -> Self {
        self.user_agent = None;
        self.without_user_agent = true;
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Set the encoding for requests that do not choose one.
    #[must_use]
    pub fn default_encoding(mut self, encoding: impl Into<Encoding>) -> Self {
        self.default_encoding = Some(encoding.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            user_agent: if self.without_user_agent {
                None
            } else {
                self.user_agent.or(defaults.user_agent)
            },
            default_headers: self.default_headers,
            default_encoding: self.default_encoding.unwrap_or(defaults.default_encoding),
        }
    }
}
