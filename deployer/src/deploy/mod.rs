//! Deployment session

pub mod fsm;
pub mod session;
