//! HTTP client implementation

use notehub_api::{TokenRequest, TokenResponse, CLIENT_CREDENTIALS_GRANT};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error, info};
use url::Url;

use crate::app::options::ClientOptions;
use crate::authn::token::AccessToken;
use crate::errors::DeployError;

/// Notehub API client.
///
/// Holds the session's bearer token once [`NotehubClient::authenticate`]
/// succeeds; every later request on the same client reuses it.
pub struct NotehubClient {
    client: Client,
    base_url: String,
    token_url: String,
    token: Option<AccessToken>,
}

impl NotehubClient {
    /// Create a client for the public Notehub API
    pub fn new() -> Result<Self, DeployError> {
        Self::with_options(ClientOptions::default())
    }

    /// Create a client with explicit endpoints and timeout
    pub fn with_options(options: ClientOptions) -> Result<Self, DeployError> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: options.api_base_url.trim_end_matches('/').to_string(),
            token_url: options.token_url,
            token: None,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the token endpoint URL
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// The bearer token held by this session, if any
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// On failure the previously held token, if any, is kept.
    pub async fn authenticate(
        &mut self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), DeployError> {
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(DeployError::AuthError(
                "client ID and client secret are required".to_string(),
            ));
        }

        debug!("POST {} (token exchange)", self.token_url);

        let form = TokenRequest {
            grant_type: CLIENT_CREDENTIALS_GRANT,
            client_id,
            client_secret,
        };
        let response = self.client.post(&self.token_url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Token exchange failed: {} - {}", status, body);
            return Err(DeployError::AuthError(format!(
                "token exchange failed: {} - {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            DeployError::AuthError(format!("malformed token response: {}", e))
        })?;
        let token = AccessToken::from_response(token_response)?;

        match token.time_until_expiry() {
            Some(secs) => info!("Authenticated with Notehub, token valid for {}s", secs),
            None => info!("Authenticated with Notehub"),
        }
        self.token = Some(token);

        Ok(())
    }

    /// URL under `{base}/projects/{project_uid}/...`
    pub(crate) fn project_url(&self, project_uid: &str, segments: &[&str]) -> Result<Url, DeployError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| DeployError::ConfigError(format!("invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("projects")
            .push(project_uid)
            .extend(segments);
        Ok(url)
    }

    /// Start a request of `method` to `url`, carrying the bearer token when one is held
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token.secret()),
            None => request,
        }
    }

    /// Turn a non-2xx response into a backend error carrying status and body
    pub(crate) async fn check(response: Response, operation: &str) -> Result<Response, DeployError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("{} failed: {} - {}", operation, status, body);
        Err(DeployError::backend(operation, status, body))
    }
}
