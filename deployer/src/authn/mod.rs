//! Authentication

pub mod probe;
