//! Platform API over HTTP

pub mod apps;
pub mod client;
