//! Error types for the test runner
//!
//! Only conditions that abort a whole run are errors. A failing test step or
//! per-test setup is a result, not an error.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test runner
#[derive(Error, Debug)]
pub enum Error {
    // === Testfile Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to parse Testfile '{path}': {error}")]
    TestfileParse { path: String, error: String },

    #[error("Invalid test entry #{index}: {reason}")]
    InvalidTestCase { index: usize, reason: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Execution Errors ===
    #[error("Failed to start '{shell}' for script '{script}': {source}")]
    Spawn {
        shell: String,
        script: String,
        #[source]
        source: io::Error,
    },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an invalid test entry error
    pub fn invalid_test_case(index: usize, reason: &str) -> Self {
        Self::InvalidTestCase {
            index,
            reason: reason.to_string(),
        }
    }

    /// Create an interpreter spawn error
    pub fn spawn(shell: &str, script: &str, source: io::Error) -> Self {
        Self::Spawn {
            shell: shell.to_string(),
            script: script.to_string(),
            source,
        }
    }
}
