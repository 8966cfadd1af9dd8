//! DigitalOcean App Platform API models
//!
//! Request and response bodies for the subset of the control API used to
//! deploy applications. No transport lives here.

pub mod models;

pub use models::*;
