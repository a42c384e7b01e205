//! Deployment configuration

pub mod deployment;
pub mod inputs;
