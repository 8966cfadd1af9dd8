//! appdeploy library
//!
//! Deploys a container image to DigitalOcean App Platform, reconciling it
//! against any existing app of the same name and tracking the rollout until
//! it succeeds, fails or times out.

pub mod authn;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod platform;
pub mod status;
pub mod storage;
pub mod utils;
pub mod workers;
