//! Shared helpers for Arrow access, logging and console output.

pub mod arrow;
pub mod logging;
