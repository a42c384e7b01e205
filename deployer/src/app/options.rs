//! Client configuration options

use std::time::Duration;

/// Notehub API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.notefile.net/v1";

/// Notehub OAuth2 token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://notehub.io/oauth2/token";

/// Options for the Notehub client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API base URL
    pub api_base_url: String,

    /// OAuth2 token endpoint
    pub token_url: String,

    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientOptions {
    /// Options targeting another host, e.g. a local mock server.
    ///
    /// The token endpoint becomes `{host}/oauth2/token` and the API
    /// base `{host}/v1`.
    pub fn for_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            api_base_url: format!("{}/v1", host),
            token_url: format!("{}/oauth2/token", host),
            ..Default::default()
        }
    }
}
