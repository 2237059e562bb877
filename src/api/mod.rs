//! Typed client for the tester web service
//!
//! `types` holds the wire model; `client` holds the [`ConsoleApi`] trait and
//! its reqwest implementation.

pub mod client;
pub mod types;

pub use client::{ConsoleApi, HttpApi};
pub use types::{
    Device, DeviceRegistry, FileResponse, PromptBundle, PromptBundleSet, PromptSchema, RunRequest,
    Test, TestCatalog, STREAM_SENTINEL,
};
