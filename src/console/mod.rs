//! Run execution and streaming console
//!
//! The core of the crate: translation of the run output's escape sequences
//! (`ansi`), the schema-driven bundle form (`form`), the editable test
//! order (`order`), the run session state (`session`), and the orchestrator
//! that drives submission and the polling loop (`orchestrator`).

pub mod ansi;
pub mod form;
pub mod order;
pub mod orchestrator;
pub mod session;

pub use form::{BundleForm, FieldGroup};
pub use order::TestOrderModel;
pub use orchestrator::{OutputSink, RunOrchestrator, StdoutSink, TickOutcome};
pub use session::{RunSession, RunState};
