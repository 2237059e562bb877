//! Wire types for the tester web service
//!
//! Field names follow the server's JSON exactly; several of them predate
//! this client and cannot be renamed without breaking the protocol
//! (`doesntwant`, `mustfail`, `cakey`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A registered network device, keyed by name in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Device {
    /// Address the tester dials, host:port
    pub address: String,
    /// Name of the uploaded CA certificate file
    #[serde(default)]
    pub ca: String,
    /// Name of the uploaded CA private key file
    #[serde(default)]
    pub cakey: String,
}

/// Device registry as returned by `GET /target`
pub type DeviceRegistry = HashMap<String, Device>;

/// A named set of prompt values and uploaded file handles used to
/// parameterize a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PromptBundle {
    pub name: String,
    #[serde(default)]
    pub prompts: HashMap<String, String>,
    #[serde(default)]
    pub files: HashMap<String, String>,
}

/// All saved bundles as returned by `GET /prompts`
pub type PromptBundleSet = HashMap<String, PromptBundle>;

/// Server-declared field keys a bundle editor must expose,
/// from `GET /prompts/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PromptSchema {
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// One scripted conformance test as declared by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Test {
    pub name: String,
    #[serde(default)]
    pub args: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub doesntwant: String,
    #[serde(default)]
    pub mustfail: bool,
    #[serde(default)]
    pub prompt: Vec<String>,
    #[serde(default)]
    pub wait: u64,
    #[serde(default)]
    pub wants: String,
}

/// Test catalog grouped by suite name, from `GET /test`
pub type TestCatalog = HashMap<String, Vec<Test>>;

/// Run submission payload for `POST /run`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Name of the prompt bundle to parameterize the run with
    pub prompts: String,
    /// Name of the device under test
    pub device: String,
    /// Ordered test names to execute
    pub tests: Vec<String>,
}

/// Handle assigned by the server to an uploaded file, from `POST /file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileResponse {
    pub filename: String,
}

/// Exact literal the output stream emits when a run has finished.
///
/// Not the conventional end-of-file spelling; the server writes this token
/// verbatim and both sides must agree on it.
pub const STREAM_SENTINEL: &str = "E0F";
