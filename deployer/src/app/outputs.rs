//! Deployment outputs for the invoking workflow

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::errors::DeployError;

/// Environment variable naming the GitHub Actions output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

pub const DEPLOYMENT_STATUS: &str = "deployment-status";
pub const FIRMWARE_FILENAME: &str = "firmware-filename";

/// Where outputs are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append `name=value` lines to a file
    File(PathBuf),

    /// Print `name=value` lines on stdout
    Stdout,
}

impl OutputSink {
    /// Use `$GITHUB_OUTPUT` when set, stdout otherwise
    pub fn from_env() -> Self {
        match std::env::var(GITHUB_OUTPUT_ENV) {
            Ok(path) if !path.is_empty() => OutputSink::File(PathBuf::from(path)),
            _ => OutputSink::Stdout,
        }
    }

    /// Emit the deployment status and, when known, the firmware filename
    pub async fn write(&self, status: &str, firmware_filename: Option<&str>) -> Result<(), DeployError> {
        let mut lines = format_output(DEPLOYMENT_STATUS, status);
        if let Some(filename) = firmware_filename {
            lines.push_str(&format_output(FIRMWARE_FILENAME, filename));
        }

        match self {
            OutputSink::File(path) => append(path, &lines).await,
            OutputSink::Stdout => {
                print!("{}", lines);
                Ok(())
            }
        }
    }
}

fn format_output(name: &str, value: &str) -> String {
    // Values are single-line; strip anything that would start a new output
    let value: String = value.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    format!("{}={}\n", name, value)
}

async fn append(path: &Path, contents: &str) -> Result<(), DeployError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}
