//! Long-running deploy steps

pub mod deployer;
pub mod poller;
