//! Host DFU API client

use notehub_api::{DfuUpdateRequest, FirmwareType};
use reqwest::Method;
use tracing::{debug, info};
use url::Url;

use crate::config::deployment::DeploymentConfig;
use crate::errors::DeployError;
use crate::http::client::NotehubClient;
use crate::http::query::QueryParams;

impl NotehubClient {
    /// Request a host firmware update of `artifact_filename` on every
    /// device matching the config's targeting criteria
    pub async fn trigger_dfu(
        &self,
        config: &DeploymentConfig,
        artifact_filename: &str,
    ) -> Result<(), DeployError> {
        let query = QueryParams::from_targeting(&config.targeting);
        let url = self.dfu_url(config.project_uid(), &query)?;
        debug!("POST {}", url);

        let body = DfuUpdateRequest {
            filename: artifact_filename.to_string(),
        };
        let response = self.request(Method::POST, url).json(&body).send().await?;
        let response = Self::check(response, "dfu trigger").await?;

        let body = response.text().await.unwrap_or_default();
        debug!("DFU trigger response: {}", body);
        info!(
            "DFU of {} requested for {} targeting parameter(s)",
            artifact_filename,
            query.len()
        );

        Ok(())
    }

    /// `{base}/projects/{project_uid}/dfu/host/update`, followed by the
    /// encoded query when it is not empty
    pub fn dfu_url(&self, project_uid: &str, query: &QueryParams) -> Result<Url, DeployError> {
        let mut url = self.project_url(
            project_uid,
            &["dfu", FirmwareType::Host.as_str(), "update"],
        )?;
        if !query.is_empty() {
            url.set_query(Some(&query.encode()));
        }
        Ok(url)
    }
}
