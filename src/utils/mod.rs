//! Shared helpers for the user catalog

pub mod logging;
pub mod patch;
