//! # CLI Integration Tests / 命令行集成测试
//!
//! Runs the `async-unit` binary: creating, checking and rendering.
//!
//! 运行 `async-unit` 可执行文件：创建、检查与渲染。

mod common;

use assert_cmd::prelude::*;
use async_unit::reporting::{with_destination, Destination};
use async_unit::{ReportFormat, TestSuite};
use common::{quiet_options, SharedBuf};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn async_unit() -> Command {
    let mut cmd = Command::cargo_bin("async-unit").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_options(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("UnitTest.toml");
    fs::write(&path, content).unwrap();
    path
}

/// `init --non-interactive` writes default options that `check` accepts.
///
/// `init --non-interactive` 写出的默认选项可以通过 `check`。
#[test]
fn test_init_then_check() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("UnitTest.toml");

    async_unit()
        .args(["--lang", "en", "init", "--non-interactive", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("timeout_ms = 120000"), "{written}");
    assert!(written.contains("language = \"en\""), "{written}");

    async_unit()
        .args(["--lang", "en", "check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"))
        .stdout(predicate::str::contains("Step timeout: 120000 ms"))
        .stdout(predicate::str::contains("console (simple)"));
}

#[test]
fn test_check_lists_reporters() {
    let dir = tempdir().unwrap();
    let path = write_options(
        dir.path(),
        r#"
timeout_ms = 250
use_event_loop = true

[[reporters]]
to = "file:reports"
format = "junit"

[[reporters]]
to = "log"
"#,
    );

    async_unit()
        .args(["--lang", "en", "check", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Step timeout: 250 ms"))
        .stdout(predicate::str::contains("Execution context: Require a runtime"))
        .stdout(predicate::str::contains("Reporters (2):"))
        .stdout(predicate::str::contains("file:reports (junit)"))
        .stdout(predicate::str::contains("log (simple)"));
}

#[test]
fn test_check_rejects_invalid_target() {
    let dir = tempdir().unwrap();
    let path = write_options(dir.path(), "[[reporters]]\nto = \"printer\"\n");

    async_unit()
        .args(["check", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid report target 'printer'"));
}

#[test]
fn test_check_missing_file() {
    let dir = tempdir().unwrap();

    async_unit()
        .args(["check", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read options file"));
}

#[test]
fn test_check_in_chinese() {
    let dir = tempdir().unwrap();
    let path = write_options(dir.path(), "");

    async_unit()
        .args(["--lang", "zh-CN", "check", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("步骤超时：120000 毫秒"));
}

/// Records a suite with the json format, then renders the log as text.
///
/// 使用 json 格式记录套件，然后将日志渲染为文本。
#[test]
fn test_render_json_log() {
    let buf = SharedBuf::default();
    let json = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Json, "en");
    let mut suite = TestSuite::create("recorded");
    suite.test("ok", |_| Ok(()));
    suite.test("bad", |ctx| {
        ctx.fail("nope")?;
        Ok(())
    });
    suite.run_with_reporters(quiet_options(), vec![json]).unwrap();

    let dir = tempdir().unwrap();
    let log = dir.path().join("recorded.jsonl");
    fs::write(&log, buf.contents()).unwrap();

    async_unit()
        .args(["--lang", "en", "render", "--input"])
        .arg(&log)
        .args(["--format", "simple"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Passed ok"))
        .stdout(predicate::str::contains("Failed bad"))
        .stdout(predicate::str::contains(
            "End test suite recorded , run: 2, Failures: 1, Errors: 0",
        ));

    let out = dir.path().join("out");
    async_unit()
        .args(["render", "--input"])
        .arg(&log)
        .args(["--format", "html", "--to"])
        .arg(format!("file:{}", out.display()))
        .assert()
        .success();
    assert!(out.join("recorded.html").exists());
}

#[test]
fn test_render_rejects_unknown_format() {
    async_unit()
        .args(["render", "--input", "events.jsonl", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pdf"));
}

#[test]
fn test_help_lists_commands() {
    async_unit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("render"));
}
