//! Deployment session runner
//!
//! Authenticates, uploads the firmware and triggers the DFU, in that
//! order, on one client. Each step is raced against a cancellation
//! signal; the first failure halts the session.

use std::future::Future;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::deployment::DeploymentConfig;
use crate::deploy::fsm::{SessionEvent, SessionFsm, SessionState};
use crate::errors::DeployError;
use crate::http::api::NotehubApi;

/// Status reported for a completed deployment
pub const STATUS_SUCCESS: &str = "success";

/// Status reported for a failed deployment
pub const STATUS_FAILED: &str = "failed";

/// Result of a completed deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub status: String,
    pub firmware_filename: String,
}

/// A deployment that halted before the DFU was triggered
#[derive(Error, Debug)]
#[error("deployment halted in {halted_at} state")]
pub struct DeploymentFailure {
    /// Last state the session reached
    pub halted_at: SessionState,

    /// Artifact filename when the upload had already succeeded
    pub firmware_filename: Option<String>,

    #[source]
    pub error: DeployError,
}

/// Run a full deployment session.
///
/// `shutdown` resolving aborts the in-flight call with
/// [`DeployError::Cancelled`].
pub async fn run<A>(
    api: &mut A,
    config: &DeploymentConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<DeploymentOutcome, DeploymentFailure>
where
    A: NotehubApi + ?Sized,
{
    tokio::pin!(shutdown);
    let mut fsm = SessionFsm::new();

    if config.targeting.is_empty() {
        warn!("No targeting criteria supplied; the DFU request will not filter devices");
    }

    info!("Authenticating with Notehub...");
    let result = tokio::select! {
        result = api.authenticate(config.client_id(), config.client_secret().expose_secret()) => result,
        _ = &mut shutdown => Err(DeployError::Cancelled("authentication".to_string())),
    };
    step(&mut fsm, result.map(|_| SessionEvent::Authenticated))?;

    info!("Uploading firmware {}...", config.firmware_file().display());
    let result = tokio::select! {
        result = api.upload_firmware(config.project_uid(), config.firmware_file()) => result,
        _ = &mut shutdown => Err(DeployError::Cancelled("firmware upload".to_string())),
    };
    step(&mut fsm, result.map(SessionEvent::FirmwareUploaded))?;

    let artifact = fsm.artifact().unwrap_or_default().to_string();

    info!("Triggering DFU of {}...", artifact);
    let result = tokio::select! {
        result = api.trigger_dfu(config, &artifact) => result,
        _ = &mut shutdown => Err(DeployError::Cancelled("dfu trigger".to_string())),
    };
    step(&mut fsm, result.map(|_| SessionEvent::DfuTriggered))?;

    info!("Deployment of {} to project {} complete", artifact, config.project_uid());
    Ok(DeploymentOutcome {
        status: STATUS_SUCCESS.to_string(),
        firmware_filename: artifact,
    })
}

/// Feed a step's result into the FSM, halting the session on error
fn step(
    fsm: &mut SessionFsm,
    result: Result<SessionEvent, DeployError>,
) -> Result<(), DeploymentFailure> {
    let outcome = match result {
        Ok(event) => fsm.process(event),
        Err(error) => {
            error!("Deployment failed in {} state: {}", fsm.state(), error);
            fsm.process(SessionEvent::Failed(error.to_string()))
                .and(Err(error))
        }
    };

    outcome.map_err(|error| DeploymentFailure {
        halted_at: fsm.state(),
        firmware_filename: fsm.artifact().map(str::to_string),
        error,
    })
}
