//! gNxI Console - an operator console for conformance test runs
//!
//! Submits scripted protocol-conformance suites to the tester web service
//! and streams their output live until the run completes.

pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod console;

// Re-export commonly used types for tests
pub use api::{ConsoleApi, RunRequest};
pub use common::{Error, Result};
pub use console::{RunOrchestrator, RunState};
