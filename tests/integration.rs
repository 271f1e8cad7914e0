//! End-to-end tests for the testfile CLI
//!
//! Each test writes one or more Testfiles into a temporary directory, runs
//! the built binary against them and checks the report and exit code.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Test context with a scratch directory
struct TestContext {
    dir: TempDir,
}

/// Captured run of the binary
struct RunOutput {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a Testfile; `{dir}` is replaced by the scratch directory
    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        let content = content.replace("{dir}", &self.dir.path().display().to_string());
        fs::write(&path, content).expect("Failed to write Testfile");
        path
    }

    fn run(&self, args: &[&str]) -> RunOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_testfile"))
            .args(args)
            .arg("--no-color")
            .current_dir(self.dir.path())
            .env("TESTFILE_CONFIG", self.path("no-such-config.toml"))
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run testfile");

        RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }

    fn run_file(&self, path: &Path, extra: &[&str]) -> RunOutput {
        let file = path.to_str().expect("utf-8 temp path");
        let mut args = vec!["-f", file];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

#[test]
fn passing_test_reports_pass() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
tests:
  - test: test_1
    steps:
      - echo foo
"#,
    );
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "test_1 ... PASS\n");
}

#[test]
fn default_file_name_is_testfile() {
    let ctx = TestContext::new();
    ctx.write("Testfile", "tests:\n  - test: implicit\n    steps: 'true'\n");
    let out = ctx.run(&[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "implicit ... PASS\n");
}

#[test]
fn failing_step_does_not_fail_the_run() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
tests:
  - test: test_1
    steps:
      - echo foo
  - test: test_2
    steps:
      - echo bar
      - exit 3
"#,
    );
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "test_1 ... PASS\n\
         test_2 ... FAILED\n\
         Command 'echo bar;exit 3' failed; expected exitcode 0, but was 3\n"
    );
}

#[test]
fn fixtures_run_in_lifecycle_order() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
fixture:
  onetime_setup: echo onetime_setup >> {dir}/log
  setup: echo setup >> {dir}/log
  teardown: echo teardown >> {dir}/log
  onetime_teardown: echo onetime_teardown >> {dir}/log
tests:
  - test: a
    steps: echo a >> {dir}/log
  - disabled_test: skipped
    steps: echo skipped >> {dir}/log
  - test: b
    steps:
      - echo b >> {dir}/log
      - exit 1
"#,
    );
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);

    let log = fs::read_to_string(ctx.path("log")).expect("log written");
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        vec![
            "onetime_setup",
            "setup",
            "a",
            "teardown",
            "setup",
            "b",
            "teardown",
            "onetime_teardown",
        ]
    );
    assert!(out.stdout.contains("a ... PASS\n"));
    assert!(out.stdout.contains("skipped ... PASS (disabled)\n"));
    assert!(out.stdout.contains("b ... FAILED\n"));
}

#[test]
fn failed_setup_skips_steps_and_still_tears_down() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
fixture:
  setup: exit 4
  teardown: touch {dir}/torn_down
tests:
  - test: t
    steps: touch {dir}/ran
"#,
    );
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(0));
    assert!(ctx.path("torn_down").exists());
    assert!(!ctx.path("ran").exists());
    assert!(out.stdout.contains("t ... FAILED"));
    assert!(out.stdout.contains(&format!(
        "Command 'touch {}/ran' failed; expected exitcode 0, but was 4",
        ctx.dir.path().display()
    )));
}

#[test]
fn failed_onetime_setup_exits_with_its_status() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
fixture:
  onetime_setup: exit 7
  onetime_teardown: touch {dir}/onetime_teardown
tests:
  - test: never
    steps: touch {dir}/ran
"#,
    );
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(7));
    assert_eq!(out.stdout, "");
    assert!(!ctx.path("ran").exists());
    assert!(!ctx.path("onetime_teardown").exists());
}

#[test]
fn failed_onetime_teardown_exits_after_reporting() {
    let ctx = TestContext::new();
    let first = ctx.write(
        "first.yml",
        "fixture:\n  onetime_teardown: exit 5\ntests:\n  - test: t\n    steps: 'true'\n",
    );
    let second = ctx.write("second.yml", "tests:\n  - test: never\n    steps: 'true'\n");

    let out = ctx.run(&[
        "-f",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ]);
    assert_eq!(out.code, Some(5));
    assert_eq!(out.stdout, "t ... PASS\n");
}

#[test]
fn multiple_files_run_in_order() {
    let ctx = TestContext::new();
    let first = ctx.write("first.yml", "tests:\n  - test: one\n    steps: 'true'\n");
    let second = ctx.write("second.yml", "tests:\n  - test: two\n    steps: 'true'\n");

    let out = ctx.run(&[
        "-f",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ]);
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "one ... PASS\ntwo ... PASS\n");
}

#[test]
fn missing_file_prints_usage_and_exits_1() {
    let ctx = TestContext::new();
    let out = ctx.run(&["-f", "does-not-exist.yml"]);
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("does-not-exist.yml not found"));
    assert!(out.stdout.contains("Usage"));
}

#[test]
fn verbose_dumps_every_command() {
    let ctx = TestContext::new();
    let file = ctx.write(
        "Testfile",
        r#"
fixture:
  setup: echo ready
tests:
  - test: t
    steps:
      - echo out
      - echo err >&2
"#,
    );
    let out = ctx.run_file(&file, &["-v"]);
    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "Out: [\nready\n]\nErr: [\n\n]\nReturncode: 0\n\
         Out: [\nout\n]\nErr: [\nerr\n]\nReturncode: 0\n\
         t ... PASS\n"
    );
}

#[test]
fn tests_mapping_runs_nothing() {
    let ctx = TestContext::new();
    let file = ctx.write("Testfile", "tests: {}\n");
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "");
}

#[test]
fn malformed_testfile_is_an_error() {
    let ctx = TestContext::new();
    let file = ctx.write("Testfile", "tests:\n  - description: no name\n");
    let out = ctx.run_file(&file, &[]);
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("Invalid test entry #1"));
}

#[test]
fn configured_shell_is_used() {
    let ctx = TestContext::new();
    let config = ctx.path("config.toml");
    fs::write(&config, "[shell]\nprogram = \"/no/such/shell\"\n").unwrap();
    let file = ctx.write("Testfile", "tests:\n  - test: t\n    steps: 'true'\n");

    let output = Command::new(env!("CARGO_BIN_EXE_testfile"))
        .args(["-f", file.to_str().unwrap()])
        .env("TESTFILE_CONFIG", &config)
        .output()
        .expect("Failed to run testfile");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/no/such/shell"));
}
