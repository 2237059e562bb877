//! Common utilities shared across the console
//!
//! Error types, configuration loading, logging setup, and config paths.

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
