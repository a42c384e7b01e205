//! Deployment operations as a trait, for testability

use std::path::Path;

use async_trait::async_trait;

use crate::config::deployment::DeploymentConfig;
use crate::errors::DeployError;
use crate::http::client::NotehubClient;

/// The three backend calls a deployment session makes
#[async_trait]
pub trait NotehubApi: Send + Sync {
    /// Exchange client credentials for a session bearer token
    async fn authenticate(&mut self, client_id: &str, client_secret: &str)
        -> Result<(), DeployError>;

    /// Upload a firmware image, returning its artifact filename
    async fn upload_firmware(&self, project_uid: &str, file_path: &Path)
        -> Result<String, DeployError>;

    /// Trigger a host DFU of an uploaded artifact
    async fn trigger_dfu(
        &self,
        config: &DeploymentConfig,
        artifact_filename: &str,
    ) -> Result<(), DeployError>;
}

#[async_trait]
impl NotehubApi for NotehubClient {
    async fn authenticate(
        &mut self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<(), DeployError> {
        NotehubClient::authenticate(self, client_id, client_secret).await
    }

    async fn upload_firmware(
        &self,
        project_uid: &str,
        file_path: &Path,
    ) -> Result<String, DeployError> {
        NotehubClient::upload_firmware(self, project_uid, file_path).await
    }

    async fn trigger_dfu(
        &self,
        config: &DeploymentConfig,
        artifact_filename: &str,
    ) -> Result<(), DeployError> {
        NotehubClient::trigger_dfu(self, config, artifact_filename).await
    }
}
