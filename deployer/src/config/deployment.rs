//! Deployment configuration record

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DeployError;

/// Optional device targeting criteria.
///
/// Every field holds the raw, possibly comma-separated value exactly as
/// supplied; splitting happens when the DFU query is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    pub device_uid: Option<String>,
    pub tag: Option<String>,
    pub serial_number: Option<String>,
    pub fleet_uid: Option<String>,
    pub product_uid: Option<String>,
    pub notecard_firmware: Option<String>,
    pub location: Option<String>,
    pub sku: Option<String>,
}

impl Targeting {
    /// Query parameter name and raw value for every field, in the order
    /// the DFU query is assembled
    pub fn fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("deviceUID", self.device_uid.as_deref()),
            ("tags", self.tag.as_deref()),
            ("serialNumber", self.serial_number.as_deref()),
            ("fleetUID", self.fleet_uid.as_deref()),
            ("productUID", self.product_uid.as_deref()),
            ("notecardFirmware", self.notecard_firmware.as_deref()),
            ("location", self.location.as_deref()),
            ("sku", self.sku.as_deref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields()
            .iter()
            .all(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
    }
}

/// Everything a deployment session needs, validated at construction
#[derive(Debug)]
pub struct DeploymentConfig {
    project_uid: String,
    firmware_file: PathBuf,
    client_id: String,
    client_secret: SecretString,

    /// Device targeting criteria
    pub targeting: Targeting,
}

impl DeploymentConfig {
    /// Create a config, rejecting empty required fields
    pub fn new(
        project_uid: impl Into<String>,
        firmware_file: impl Into<PathBuf>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        targeting: Targeting,
    ) -> Result<Self, DeployError> {
        let project_uid = project_uid.into();
        let firmware_file = firmware_file.into();
        let client_id = client_id.into();

        require("project_uid", &project_uid)?;
        require("firmware_file", &firmware_file.to_string_lossy())?;
        require("client_id", &client_id)?;
        require("client_secret", client_secret.expose_secret())?;

        Ok(Self {
            project_uid,
            firmware_file,
            client_id,
            client_secret,
            targeting,
        })
    }

    pub fn project_uid(&self) -> &str {
        &self.project_uid
    }

    pub fn firmware_file(&self) -> &Path {
        &self.firmware_file
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }
}

fn require(field: &str, value: &str) -> Result<(), DeployError> {
    if value.trim().is_empty() {
        return Err(DeployError::ConfigError(format!("{} is required", field)));
    }
    Ok(())
}
