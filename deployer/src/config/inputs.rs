//! Loading deployment inputs from the environment and command line
//!
//! Inputs follow the GitHub Actions convention: an input named
//! `project_uid` arrives as the `INPUT_PROJECT_UID` environment variable.
//! The same names are accepted as `--project_uid=...` (or
//! `--project-uid=...`) arguments, which take precedence.

use std::collections::HashMap;

use secrecy::SecretString;

use crate::config::deployment::{DeploymentConfig, Targeting};
use crate::errors::DeployError;
use crate::logs::LogLevel;

/// Prefix of environment variables carrying inputs
pub const ENV_PREFIX: &str = "INPUT_";

/// Parsed wrapper inputs
#[derive(Debug)]
pub struct Inputs {
    pub deployment: DeploymentConfig,
    pub log_level: LogLevel,
}

impl Inputs {
    /// Load inputs from the process environment and the given arguments
    pub fn load(cli_args: &HashMap<String, String>) -> Result<Self, DeployError> {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_args)
    }

    /// Load inputs using `lookup` to resolve environment variables
    pub fn from_lookup<F>(lookup: F, cli_args: &HashMap<String, String>) -> Result<Self, DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let args: HashMap<String, &String> = cli_args
            .iter()
            .map(|(key, value)| (key.replace('-', "_").to_lowercase(), value))
            .collect();

        let get = |name: &str| -> Option<String> {
            args.get(name)
                .map(|v| v.to_string())
                .or_else(|| lookup(&format!("{}{}", ENV_PREFIX, name.to_uppercase())))
        };
        let optional = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let targeting = Targeting {
            device_uid: optional("device_uid"),
            tag: optional("tag"),
            serial_number: optional("serial_number"),
            fleet_uid: optional("fleet_uid"),
            product_uid: optional("product_uid"),
            notecard_firmware: optional("notecard_firmware"),
            location: optional("location"),
            sku: optional("sku"),
        };

        let deployment = DeploymentConfig::new(
            get("project_uid").unwrap_or_default().trim(),
            get("firmware_file").unwrap_or_default().trim(),
            get("client_id").unwrap_or_default().trim(),
            SecretString::from(get("client_secret").unwrap_or_default()),
            targeting,
        )?;

        let log_level = match optional("log_level") {
            Some(level) => level.parse().map_err(DeployError::ConfigError)?,
            None => LogLevel::default(),
        };

        Ok(Self {
            deployment,
            log_level,
        })
    }
}
