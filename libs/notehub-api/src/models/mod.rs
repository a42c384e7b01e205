//! API models

use serde::{Deserialize, Serialize};

/// OAuth2 grant type used for the token exchange
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Client-credentials token request, sent form-encoded
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Firmware type the registry stores host images under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirmwareType {
    Host,
}

impl FirmwareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirmwareType::Host => "host",
        }
    }
}

/// Firmware registry entry returned after an upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirmwareInfo {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub length: Option<u64>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default, rename = "type")]
    pub firmware_type: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Body of a host DFU update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfuUpdateRequest {
    pub filename: String,
}

/// Error body returned by Notehub on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub err: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_without_expiry() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.expires_in, None);
    }

    #[test]
    fn test_token_response_missing_token_defaults_empty() {
        let resp: TokenResponse = serde_json::from_str(r#"{"token_type":"bearer"}"#).unwrap();
        assert!(resp.access_token.is_empty());
    }

    #[test]
    fn test_firmware_info_type_field() {
        let info: FirmwareInfo =
            serde_json::from_str(r#"{"filename":"app.bin","length":12,"type":"host"}"#).unwrap();
        assert_eq!(info.filename.as_deref(), Some("app.bin"));
        assert_eq!(info.firmware_type.as_deref(), Some("host"));
    }

    #[test]
    fn test_error_response() {
        let resp: ErrorResponse =
            serde_json::from_str(r#"{"err":"project not found","code":404}"#).unwrap();
        assert_eq!(resp.err, "project not found");
        assert_eq!(resp.code, Some(404));
        assert_eq!(resp.status, None);
    }

    #[test]
    fn test_dfu_request_body() {
        let body = DfuUpdateRequest {
            filename: "app.bin".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"filename":"app.bin"}"#
        );
    }
}
