//! Authentication against the Notehub token endpoint

pub mod token;
