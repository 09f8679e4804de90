//! Core CodePad library (document session, platform actions, config).

pub mod config;
pub mod logging;
pub mod platform;
pub mod session;
