//! Notehub API models
//!
//! Wire shapes for the token exchange, firmware registry and host DFU
//! endpoints.

pub mod models;

pub use models::*;
