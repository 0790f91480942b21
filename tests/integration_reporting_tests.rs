//! # Reporting Integration Tests / 报告集成测试
//!
//! Checks the text of the simple format, the files written by file targets
//! and the replay of JSON event logs.
//!
//! 检查 simple 格式的文本、文件目标写出的文件以及 JSON 事件日志的重放。

mod common;

use async_unit::reporting::json::parse_events;
use async_unit::reporting::{with_destination, Destination, ReportEvent};
use async_unit::{ReportFormat, ReportOptions, TestSuite};
use common::{quiet_options, SharedBuf};
use std::fs;
use tempfile::tempdir;

fn sample_suite() -> TestSuite {
    let mut suite = TestSuite::create("the_test_suite");
    suite.test("my_test", |ctx| {
        ctx.assert_equals(4, 2 + 2)?;
        Ok(())
    });
    suite
}

fn failing_suite() -> TestSuite {
    let mut suite = TestSuite::create("mixed suite");
    suite.test("passes", |_| Ok(()));
    suite.test("fails", |ctx| {
        ctx.assert_equals_msg("a", "b", "letters")?;
        Ok(())
    });
    suite.test("errors", |_| Err(anyhow::anyhow!("disk <full>")));
    suite
}

#[tokio::test]
async fn test_simple_format_output() {
    let buf = SharedBuf::default();
    let reporter = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Simple, "en");

    sample_suite()
        .run_with_reporters(quiet_options(), vec![reporter])
        .unwrap()
        .wait()
        .await;

    assert_eq!(
        buf.contents(),
        "Begin test suite the_test_suite\n\
         Begin test my_test\n\
         Passed my_test\n\
         End test suite the_test_suite , run: 1, Failures: 0, Errors: 0\n"
    );
}

#[tokio::test]
async fn test_simple_format_failures_and_suite_errors() {
    let buf = SharedBuf::default();
    let reporter = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Simple, "en");
    let mut suite = failing_suite();
    suite.after(|ctx| {
        ctx.fail("teardown")?;
        Ok(())
    });

    suite
        .run_with_reporters(quiet_options(), vec![reporter])
        .unwrap()
        .wait()
        .await;

    let out = buf.contents();
    assert!(out.contains("Failed fails\n  letters: expected <\"a\"> but was <\"b\">\n"), "{out}");
    assert!(out.contains("Failed errors\n  disk <full>\n"), "{out}");
    assert!(out.contains("Suite error: teardown\n"), "{out}");
    assert!(out.ends_with("End test suite mixed suite , run: 3, Failures: 1, Errors: 2\n"), "{out}");
}

#[tokio::test]
async fn test_simple_format_is_localized() {
    let buf = SharedBuf::default();
    let reporter = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Simple, "zh-CN");

    sample_suite()
        .run_with_reporters(quiet_options(), vec![reporter])
        .unwrap()
        .wait()
        .await;

    let out = buf.contents();
    assert!(out.starts_with("开始测试套件 the_test_suite\n"), "{out}");
    assert!(out.contains("通过 my_test\n"), "{out}");
}

#[tokio::test]
async fn test_file_targets_write_one_file_per_format() {
    let dir = tempdir().unwrap();
    let to = format!("file:{}", dir.path().display());
    let mut options = quiet_options();
    for format in [ReportFormat::Simple, ReportFormat::Junit, ReportFormat::Html, ReportFormat::Json] {
        options = options.with_reporter(ReportOptions::new(to.clone(), format));
    }

    failing_suite().run_with(options).unwrap().wait().await;

    let text = fs::read_to_string(dir.path().join("mixed_suite.txt")).unwrap();
    assert!(text.starts_with("Begin test suite mixed suite\n"));
    assert!(!text.contains('\u{1b}'), "file output must not be colored");

    let xml = fs::read_to_string(dir.path().join("mixed_suite.xml")).unwrap();
    assert!(xml.contains(r#"<testsuite name="mixed suite" tests="3" failures="1" errors="1""#), "{xml}");
    assert!(xml.contains(r#"<testcase name="passes" classname="mixed suite""#));
    assert!(xml.contains(r#"<failure type="Assertion""#));
    assert!(xml.contains(r#"<error type="Error" message="disk &lt;full&gt;">"#), "{xml}");

    let html = fs::read_to_string(dir.path().join("mixed_suite.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Test Suite mixed suite"));
    assert!(html.contains("status-Failed"));
    assert!(html.contains("disk &lt;full&gt;"));

    let log = fs::read_to_string(dir.path().join("mixed_suite.jsonl")).unwrap();
    let events = parse_events(&log).unwrap();
    assert_eq!(events.len(), 8);
    match events.last() {
        Some(ReportEvent::EndSuite { summary }) => {
            assert_eq!(summary.run(), 3);
            assert_eq!(summary.failures(), 1);
            assert_eq!(summary.errors(), 1);
        }
        other => panic!("expected EndSuite, got {other:?}"),
    }
}

#[tokio::test]
async fn test_json_events_are_tagged() {
    let buf = SharedBuf::default();
    let reporter = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Json, "en");

    sample_suite()
        .run_with_reporters(quiet_options(), vec![reporter])
        .unwrap()
        .wait()
        .await;

    let out = buf.contents();
    let first: serde_json::Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
    assert_eq!(first["event"], "begin_suite");
    assert_eq!(first["name"], "the_test_suite");
    assert_eq!(out.lines().count(), 4);
}

#[test]
fn test_parse_events_reports_bad_lines() {
    let log = "{\"event\":\"begin_suite\",\"name\":\"s\"}\n\nnot json\n";
    let err = parse_events(log).unwrap_err();
    assert!(format!("{err:#}").contains("line 3"), "{err:#}");
}

#[tokio::test]
async fn test_replaying_a_json_log_into_junit() {
    let buf = SharedBuf::default();
    let json = with_destination(Destination::Writer(Box::new(buf.clone())), ReportFormat::Json, "en");
    failing_suite()
        .run_with_reporters(quiet_options(), vec![json])
        .unwrap()
        .wait()
        .await;

    let xml = SharedBuf::default();
    let mut junit = with_destination(Destination::Writer(Box::new(xml.clone())), ReportFormat::Junit, "en");
    for event in parse_events(&buf.contents()).unwrap() {
        junit.handle(&event).unwrap();
    }

    let xml = xml.contents();
    assert!(xml.contains(r#"tests="3" failures="1" errors="1""#), "{xml}");
}
