//! Wrapper-facing application pieces

pub mod options;
pub mod outputs;
