//! Testfile configuration types
//!
//! Defines the data structures for deserializing YAML Testfiles.
//!
//! ```yaml
//! fixture:
//!   onetime_setup: mkdir -p /tmp/work
//!   setup:
//!     - cd /tmp/work
//!     - touch state
//!   teardown: rm -f /tmp/work/state
//!   onetime_teardown: rm -rf /tmp/work
//!
//! tests:
//!   - test: state file exists
//!     description: setup ran before the steps
//!     steps:
//!       - test -f /tmp/work/state
//!   - disabled_test: not ready yet
//!     steps: exit 1
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::common::{Error, Result};

use super::command::Script;

/// A complete Testfile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSuiteConfig {
    /// Setup and teardown scripts; all absent when the file has no `fixture`
    pub fixture: FixtureConfig,
    /// Tests in execution order
    pub tests: Vec<TestCase>,
}

/// Setup and teardown scripts shared by the whole suite
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Runs once before any test
    pub onetime_setup: Option<Script>,
    /// Runs before each enabled test
    pub setup: Option<Script>,
    /// Runs after each enabled test, whatever its outcome
    pub teardown: Option<Script>,
    /// Runs once after all tests
    pub onetime_teardown: Option<Script>,
}

/// A single entry of `tests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Value of `test` or `disabled_test`
    pub name: String,
    /// Informational only
    pub description: Option<String>,
    pub kind: TestKind,
}

/// Whether a test runs, and what it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    Enabled { steps: Script },
    Disabled,
}

impl TestCase {
    pub fn enabled(name: &str, steps: impl Into<Script>) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            kind: TestKind::Enabled {
                steps: steps.into(),
            },
        }
    }

    pub fn disabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            kind: TestKind::Disabled,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.kind, TestKind::Disabled)
    }
}

/// Top-level document as written; `tests` is kept loose so that a
/// non-sequence value can be ignored instead of rejected
#[derive(Deserialize, Debug, Default)]
struct RawSuite {
    #[serde(default)]
    fixture: Option<FixtureConfig>,
    #[serde(default)]
    tests: Option<Value>,
}

/// One entry of `tests` as written
#[derive(Deserialize, Debug)]
struct RawTestCase {
    test: Option<Value>,
    disabled_test: Option<Value>,
    description: Option<Value>,
    steps: Option<Script>,
}

/// Text form of a YAML scalar; `None` for null, sequences and mappings
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl RawTestCase {
    fn into_test_case(self, index: usize) -> Result<TestCase> {
        let (name, disabled) = match (self.test, self.disabled_test) {
            (Some(name), None) => (name, false),
            (None, Some(name)) => (name, true),
            (Some(_), Some(_)) => {
                return Err(Error::invalid_test_case(
                    index,
                    "has both 'test' and 'disabled_test'",
                ))
            }
            (None, None) => {
                return Err(Error::invalid_test_case(
                    index,
                    "needs a 'test' or 'disabled_test' name",
                ))
            }
        };
        let name = scalar_text(&name)
            .ok_or_else(|| Error::invalid_test_case(index, "test name must be a scalar"))?;

        let kind = if disabled {
            TestKind::Disabled
        } else {
            let steps = self.steps.ok_or_else(|| {
                Error::invalid_test_case(index, &format!("test '{}' has no 'steps'", name))
            })?;
            TestKind::Enabled { steps }
        };

        Ok(TestCase {
            name,
            description: self.description.as_ref().and_then(scalar_text),
            kind,
        })
    }
}

impl TestSuiteConfig {
    /// Load and parse a Testfile from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a Testfile from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        let parse_error = |error: String| Error::TestfileParse {
            path: origin.to_string(),
            error,
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Value =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        let raw: RawSuite = match document {
            Value::Null => RawSuite::default(),
            Value::Mapping(_) => {
                serde_yaml::from_value(document).map_err(|e| parse_error(e.to_string()))?
            }
            _ => return Err(parse_error("expected a mapping at the top level".to_string())),
        };

        // Anything but a sequence under `tests` means no tests
        let entries = match raw.tests {
            Some(Value::Sequence(entries)) => entries,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                tracing::warn!(origin, "'tests' is not a list ({:?}); no tests will run", other);
                Vec::new()
            }
        };

        let tests = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let index = i + 1;
                let raw: RawTestCase = serde_yaml::from_value(entry)
                    .map_err(|e| Error::invalid_test_case(index, &e.to_string()))?;
                raw.into_test_case(index)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            origin,
            tests = tests.len(),
            disabled = tests.iter().filter(|t| t.is_disabled()).count(),
            "Loaded Testfile"
        );

        Ok(Self {
            fixture: raw.fixture.unwrap_or_default(),
            tests,
        })
    }
}
