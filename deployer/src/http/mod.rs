//! Notehub HTTP API

pub mod api;
pub mod client;
pub mod dfu;
pub mod firmware;
pub mod query;
