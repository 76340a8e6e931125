//! Shared utilities for the govgate workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
