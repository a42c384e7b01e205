//! Finite State Machine for a deployment session

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DeployError;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No bearer token yet
    Unauthenticated,

    /// Token exchange succeeded
    Authenticated,

    /// Firmware is in the registry
    FirmwareUploaded,

    /// DFU requested; terminal
    DfuTriggered,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
            SessionState::FirmwareUploaded => "firmware_uploaded",
            SessionState::DfuTriggered => "dfu_triggered",
        };
        f.write_str(name)
    }
}

/// Session event
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Token exchange completed
    Authenticated,

    /// Upload completed with the artifact filename
    FirmwareUploaded(String),

    /// Trigger accepted by the backend
    DfuTriggered,

    /// The current step failed
    Failed(String),
}

/// Deployment session FSM.
///
/// A failure records the error and halts the session in the state it
/// had reached; no further events are accepted afterwards.
#[derive(Debug, Clone)]
pub struct SessionFsm {
    state: SessionState,
    artifact: Option<String>,
    error: Option<String>,
}

impl SessionFsm {
    /// Create a new FSM in the unauthenticated state
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
            artifact: None,
            error: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Uploaded artifact filename, once the upload succeeded
    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    /// Get error message if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// State the session halted in, if a step failed
    pub fn failed_at(&self) -> Option<SessionState> {
        self.error.as_ref().map(|_| self.state)
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::DfuTriggered
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: SessionEvent) -> Result<(), DeployError> {
        if self.error.is_some() {
            return Err(DeployError::InvalidTransition(format!(
                "session halted in {} state",
                self.state
            )));
        }

        let new_state = match (self.state, event) {
            (SessionState::Unauthenticated, SessionEvent::Authenticated) => {
                SessionState::Authenticated
            }
            (SessionState::Authenticated, SessionEvent::FirmwareUploaded(artifact)) => {
                self.artifact = Some(artifact);
                SessionState::FirmwareUploaded
            }
            (SessionState::FirmwareUploaded, SessionEvent::DfuTriggered) => {
                SessionState::DfuTriggered
            }
            (state, SessionEvent::Failed(err)) if state != SessionState::DfuTriggered => {
                self.error = Some(err);
                state
            }

            // Invalid transitions
            (state, event) => {
                return Err(DeployError::InvalidTransition(format!(
                    "{:?} -> {:?}",
                    state, event
                )));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for SessionFsm {
    fn default() -> Self {
        Self::new()
    }
}
