//! Run session state
//!
//! One session exists at a time; it is an owned value on the orchestrator,
//! never ambient state. The output buffer only grows for the lifetime of a
//! session and is cleared when the next submission starts one.

/// Run console state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run in flight; the form is editable
    #[default]
    Idle,
    /// Request handed to the trigger endpoint
    Submitting,
    /// Polling the output endpoint for chunks
    Streaming,
    /// Sentinel received; transitions back to Idle automatically
    Completed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::Streaming => write!(f, "streaming"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// The single run session owned by the orchestrator
#[derive(Debug, Default)]
pub struct RunSession {
    state: RunState,
    /// Accumulated translated output; append-only within one session
    output: String,
}

impl RunSession {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn set_state(&mut self, state: RunState) {
        self.state = state;
    }

    /// The transcript so far. Survives into Idle so the last run's output
    /// stays visible until the next submission.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Append an already-translated chunk
    pub fn push_output(&mut self, chunk: &str) {
        self.output.push_str(chunk);
    }

    /// Drop the previous run's transcript; called on submit only
    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}
