//! Firmware registry API client

use std::path::Path;

use notehub_api::{FirmwareInfo, FirmwareType};
use reqwest::{header, Method};
use tracing::{debug, error, info, warn};

use crate::errors::DeployError;
use crate::http::client::NotehubClient;
use crate::utils::sha256_hash;

impl NotehubClient {
    /// Upload a host firmware image to the project's firmware registry.
    ///
    /// Returns the filename the image was stored under, which identifies
    /// it in the DFU trigger.
    pub async fn upload_firmware(
        &self,
        project_uid: &str,
        file_path: &Path,
    ) -> Result<String, DeployError> {
        let data = tokio::fs::read(file_path)
            .await
            .map_err(|source| DeployError::FirmwareRead {
                path: file_path.to_path_buf(),
                source,
            })?;

        let filename = firmware_filename(file_path)?;
        info!(
            "Uploading firmware {} ({} bytes, sha256 {})",
            filename,
            data.len(),
            sha256_hash(&data)
        );

        let url = self.project_url(
            project_uid,
            &["firmware", FirmwareType::Host.as_str(), filename.as_str()],
        )?;
        debug!("PUT {}", url);

        let response = self
            .request(Method::PUT, url)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await?;
        let response = Self::check(response, "firmware upload").await?;

        let body = response.text().await?;
        let firmware: FirmwareInfo = serde_json::from_str(&body).map_err(|e| {
            error!("Upload response was not firmware metadata: {}", body);
            DeployError::JsonError(e)
        })?;
        match firmware.filename.as_deref() {
            Some(stored) if stored != filename => {
                warn!("Registry reported filename {} for upload {}", stored, filename);
            }
            _ => debug!("Firmware registered: {:?}", firmware),
        }

        info!("Firmware {} uploaded", filename);
        Ok(filename)
    }
}

/// Artifact name for a firmware path: its last path segment.
///
/// The name must be valid UTF-8; it is uploaded verbatim.
pub fn firmware_filename(file_path: &Path) -> Result<String, DeployError> {
    let name = file_path.file_name().ok_or_else(|| {
        DeployError::ConfigError(format!(
            "firmware path has no file name: {}",
            file_path.display()
        ))
    })?;

    name.to_str().map(str::to_string).ok_or_else(|| {
        DeployError::ConfigError(format!(
            "firmware file name is not valid UTF-8: {}",
            file_path.display()
        ))
    })
}
