//! OAuth2 access token

use chrono::{DateTime, Duration, Utc};
use notehub_api::TokenResponse;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::DeployError;

/// A bearer token obtained from the client-credentials exchange
#[derive(Debug)]
pub struct AccessToken {
    raw: SecretString,

    /// When the token stops being accepted, if the backend said
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Build a token from the token endpoint's response
    pub fn from_response(response: TokenResponse) -> Result<Self, DeployError> {
        if response.access_token.trim().is_empty() {
            return Err(DeployError::AuthError(
                "token response did not contain an access_token".to_string(),
            ));
        }

        if let Some(token_type) = response.token_type.as_deref() {
            if !token_type.eq_ignore_ascii_case("bearer") {
                return Err(DeployError::AuthError(format!(
                    "unsupported token type: {}",
                    token_type
                )));
            }
        }

        let expires_at = response
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(Self {
            raw: SecretString::from(response.access_token),
            expires_at,
        })
    }

    /// Raw token value for the Authorization header
    pub fn secret(&self) -> &str {
        self.raw.expose_secret()
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Seconds until expiry, if known
    pub fn time_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|at| (at - Utc::now()).num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(token: &str, token_type: Option<&str>, expires_in: Option<i64>) -> TokenResponse {
        TokenResponse {
            access_token: token.to_string(),
            token_type: token_type.map(str::to_string),
            expires_in,
            scope: None,
        }
    }

    #[test]
    fn test_token_from_response() {
        let token = AccessToken::from_response(response("abc", Some("bearer"), Some(1800))).unwrap();
        assert_eq!(token.secret(), "abc");
        assert!(!token.is_expired());
        let remaining = token.time_until_expiry().unwrap();
        assert!(remaining > 1700 && remaining <= 1800);
    }

    #[test]
    fn test_token_without_expiry() {
        let token = AccessToken::from_response(response("abc", None, None)).unwrap();
        assert!(token.expires_at.is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_empty_token_rejected() {
        let err = AccessToken::from_response(response("", Some("bearer"), Some(60))).unwrap_err();
        assert!(matches!(err, DeployError::AuthError(_)));
    }

    #[test]
    fn test_non_bearer_rejected() {
        let err = AccessToken::from_response(response("abc", Some("mac"), None)).unwrap_err();
        assert!(err.to_string().contains("mac"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::from_response(response("very-secret", None, None)).unwrap();
        assert!(!format!("{:?}", token).contains("very-secret"));
    }
}
