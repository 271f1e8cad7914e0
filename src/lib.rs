//! testfile - declarative shell test runner
//!
//! This library reads YAML Testfiles describing shell tests and fixtures and
//! runs them in a fixed setup/steps/teardown order.

pub mod cli;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{run_suite, TestSuiteConfig};
