//! Error types for the console
//!
//! Error messages name the endpoint or record involved so an operator can
//! tell a bad selection apart from a server that is down.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the console
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Request to '{path}' failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for '{path}'")]
    Api { path: String, status: u16 },

    // === Run Session Errors ===
    #[error("Cannot {action} while the run console is {state}")]
    InvalidState { action: String, state: String },

    #[error("No device named '{0}'. Use 'gnxi-console target list' to see known devices")]
    UnknownDevice(String),

    #[error("No prompt bundle named '{0}'. Use 'gnxi-console prompts list' to see saved bundles")]
    UnknownBundle(String),

    #[error("No test named '{0}' in the catalog")]
    UnknownTest(String),

    #[error("Test '{0}' is already queued")]
    DuplicateTest(String),

    // === Form Errors ===
    #[error("No form field named '{0}'")]
    FieldNotFound(String),

    #[error("Required field '{0}' is empty")]
    FieldRequired(String),

    #[error("Invalid order move '{0}': expected <from>:<to>")]
    InvalidMove(String),

    #[error("Index {index} out of bounds for test order of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a transport error for an endpoint path
    pub fn http(path: &str, source: reqwest::Error) -> Self {
        Self::Http {
            path: path.to_string(),
            source,
        }
    }

    /// Create a non-2xx status error for an endpoint path
    pub fn api(path: &str, status: u16) -> Self {
        Self::Api {
            path: path.to_string(),
            status,
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(action: &str, state: &str) -> Self {
        Self::InvalidState {
            action: action.to_string(),
            state: state.to_string(),
        }
    }
}
