//! Shared utilities for yieldwatch
//!
//! This crate provides common functionality used across the yieldwatch workspace,
//! including logging setup, configuration management, and config-file loading.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigFileError, load_json};
pub use logging::init_tracing;
