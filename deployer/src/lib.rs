//! Notehub firmware deployment
//!
//! Uploads host firmware to Notehub and triggers a device firmware update
//! on the devices selected by the targeting criteria.

pub mod app;
pub mod authn;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod http;
pub mod logs;
pub mod utils;

pub use config::deployment::{DeploymentConfig, Targeting};
pub use deploy::session::{run, DeploymentFailure, DeploymentOutcome};
pub use errors::DeployError;
pub use http::api::NotehubApi;
pub use http::client::NotehubClient;
