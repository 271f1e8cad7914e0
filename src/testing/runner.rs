//! Fixture lifecycle engine
//!
//! Runs a Testfile in a fixed order:
//!
//! 1. `onetime_setup`, once. A non-zero status ends the run with that status.
//! 2. For each test, in order: `setup`, the test's steps (skipped if setup
//!    failed), `teardown`, then the result line. Disabled tests are reported
//!    as passing without running anything.
//! 3. `onetime_teardown`, once. A non-zero status ends the run with that
//!    status even though every test has already been reported.
//!
//! Per-test failures never change the run's exit code.

use crate::common::Result;

use super::command::{CommandRunner, ExecutionResult};
use super::config::{FixtureConfig, TestCase, TestKind, TestSuiteConfig};
use super::report::{Reporter, TestOutcome};

/// Run every test in `suite` and return the process exit code
///
/// `Ok(0)` unless a one-time fixture failed, in which case its exit status is
/// returned. An `Err` means a script could not be started at all.
pub fn run_suite<'a>(
    suite: &'a TestSuiteConfig,
    runner: &'a mut dyn CommandRunner,
    reporter: &'a mut dyn Reporter,
) -> Result<i32> {
    let mut engine = Engine {
        fixture: &suite.fixture,
        runner,
        reporter,
        tally: Tally::default(),
    };
    engine.run(&suite.tests)
}

#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    failed: usize,
    disabled: usize,
}

struct Engine<'a> {
    fixture: &'a FixtureConfig,
    runner: &'a mut dyn CommandRunner,
    reporter: &'a mut dyn Reporter,
    tally: Tally,
}

impl<'a> Engine<'a> {
    fn run(&mut self, tests: &[TestCase]) -> Result<i32> {
        tracing::info!(tests = tests.len(), "Starting test suite");
        let fixture = self.fixture;

        if let Some(script) = &fixture.onetime_setup {
            let result = self.execute(&script.build())?;
            if !result.success() {
                tracing::warn!(status = result.status, "One-time setup failed; aborting run");
                return Ok(result.status);
            }
        }

        for test in tests {
            self.run_test(test)?;
        }

        if let Some(script) = &fixture.onetime_teardown {
            let result = self.execute(&script.build())?;
            if !result.success() {
                tracing::warn!(status = result.status, "One-time teardown failed");
                return Ok(result.status);
            }
        }

        tracing::info!(
            passed = self.tally.passed,
            failed = self.tally.failed,
            disabled = self.tally.disabled,
            "Test suite finished"
        );
        Ok(0)
    }

    fn run_test(&mut self, test: &TestCase) -> Result<()> {
        let steps = match &test.kind {
            TestKind::Disabled => {
                tracing::debug!(test = %test.name, "Skipping disabled test");
                self.tally.disabled += 1;
                self.reporter.test_finished(&TestOutcome::disabled(&test.name));
                return Ok(());
            }
            TestKind::Enabled { steps } => steps,
        };

        let fixture = self.fixture;
        let body = steps.build();
        let mut status = 0;

        let mut scope = TestScope::enter(self, fixture.teardown.as_ref().map(|s| s.build()));

        if let Some(setup) = &fixture.setup {
            status = scope.execute(&setup.build())?;
        }

        if status == 0 {
            status = scope.execute(&body)?;
        } else {
            tracing::debug!(test = %test.name, status, "Setup failed; skipping steps");
        }

        scope.finish()?;

        if status == 0 {
            self.tally.passed += 1;
        } else {
            self.tally.failed += 1;
        }
        self.reporter.test_finished(&TestOutcome {
            name: test.name.clone(),
            body,
            status,
            disabled: false,
        });
        Ok(())
    }

    fn execute(&mut self, script: &str) -> Result<ExecutionResult> {
        let result = self.runner.run(script)?;
        self.reporter.command_finished(&result);
        Ok(result)
    }
}

/// Per-test scope whose teardown runs on every way out of it
///
/// The normal path calls [`TestScope::finish`] so a teardown that cannot be
/// started still propagates. On an early `?` return or a panic the teardown
/// runs from `Drop` instead and its errors can only be logged.
struct TestScope<'e, 'a> {
    engine: &'e mut Engine<'a>,
    teardown: Option<String>,
}

impl<'e, 'a> TestScope<'e, 'a> {
    fn enter(engine: &'e mut Engine<'a>, teardown: Option<String>) -> Self {
        Self { engine, teardown }
    }

    fn execute(&mut self, script: &str) -> Result<i32> {
        Ok(self.engine.execute(script)?.status)
    }

    fn finish(mut self) -> Result<()> {
        if let Some(script) = self.teardown.take() {
            let result = self.engine.execute(&script)?;
            if !result.success() {
                tracing::debug!(status = result.status, "Teardown returned non-zero");
            }
        }
        Ok(())
    }
}

impl Drop for TestScope<'_, '_> {
    fn drop(&mut self) {
        if let Some(script) = self.teardown.take() {
            tracing::debug!("Running teardown after an interrupted test");
            if let Err(e) = self.engine.execute(&script) {
                tracing::warn!("Teardown failed: {}", e);
            }
        }
    }
}
