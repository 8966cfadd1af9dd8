//! Persistent configuration and handles

pub mod layout;
pub mod settings;
