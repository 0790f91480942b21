//! # Options Module Unit Tests / 选项模块单元测试
//!
//! Tests for `TestOptions` and `ReportOptions`: defaults, TOML loading and
//! report target parsing.
//!
//! `TestOptions` 与 `ReportOptions` 的测试：默认值、TOML 加载以及报告目标解析。

use async_unit::config::DEFAULT_TIMEOUT_MS;
use async_unit::{ReportFormat, ReportOptions, ReportTarget, TestOptions, UnitError};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_default_options() {
    let options = TestOptions::default();
    assert_eq!(options.timeout_ms, DEFAULT_TIMEOUT_MS);
    assert_eq!(options.timeout(), Duration::from_secs(120));
    assert_eq!(options.use_event_loop, None);
    assert_eq!(options.language, "en");
    assert!(options.reporters.is_empty());

    let effective = options.effective_reporters();
    assert_eq!(effective, vec![ReportOptions::new("console", ReportFormat::Simple)]);
}

#[test]
fn test_builder_setters() {
    let options = TestOptions::new()
        .with_timeout(Duration::from_millis(1500))
        .with_use_event_loop(Some(true))
        .with_language("zh-CN")
        .with_reporter(ReportOptions::new("file:out", ReportFormat::Junit));

    assert_eq!(options.timeout_ms, 1500);
    assert_eq!(options.use_event_loop, Some(true));
    assert_eq!(options.language, "zh-CN");
    assert_eq!(options.reporters.len(), 1);
}

#[test]
fn test_report_target_parsing() {
    assert_eq!("console".parse::<ReportTarget>().unwrap(), ReportTarget::Console);
    assert_eq!("log".parse::<ReportTarget>().unwrap(), ReportTarget::Log);
    assert_eq!(
        "file:target/reports".parse::<ReportTarget>().unwrap(),
        ReportTarget::File(PathBuf::from("target/reports"))
    );

    for bad in ["file:", "stdout", "", "files:out"] {
        assert!(
            matches!(bad.parse::<ReportTarget>(), Err(UnitError::InvalidReportTarget(_))),
            "'{bad}' should be rejected"
        );
    }
}

#[test]
fn test_report_format_parsing() {
    assert_eq!("JUnit".parse::<ReportFormat>().unwrap(), ReportFormat::Junit);
    assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
    assert_eq!(ReportFormat::Html.extension(), "html");
    assert_eq!(ReportFormat::Simple.to_string(), "simple");
    assert!(matches!(
        "xml".parse::<ReportFormat>(),
        Err(UnitError::InvalidReportFormat(_))
    ));
}

#[test]
fn test_validate_rejects_bad_target() {
    let options = TestOptions::default().with_reporter(ReportOptions::new("nowhere", ReportFormat::Simple));
    assert!(matches!(options.validate(), Err(UnitError::InvalidReportTarget(_))));
}

#[test]
fn test_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("UnitTest.toml");
    fs::write(
        &path,
        r#"
timeout_ms = 500
use_event_loop = false
language = "zh-CN"

[[reporters]]
to = "console"

[[reporters]]
to = "file:reports"
format = "junit"
"#,
    )
    .unwrap();

    let options = TestOptions::load(&path).unwrap();
    assert_eq!(options.timeout_ms, 500);
    assert_eq!(options.use_event_loop, Some(false));
    assert_eq!(options.language, "zh-CN");
    assert_eq!(
        options.reporters,
        vec![
            ReportOptions::new("console", ReportFormat::Simple),
            ReportOptions::new("file:reports", ReportFormat::Junit),
        ]
    );
}

#[test]
fn test_load_empty_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").unwrap();
    assert_eq!(TestOptions::load(&path).unwrap(), TestOptions::default());
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert!(matches!(TestOptions::load(&missing), Err(UnitError::ReadConfig { .. })));

    let invalid = dir.path().join("invalid.toml");
    fs::write(&invalid, "timeout_ms = \"soon\"\n[[reporters]\n").unwrap();
    assert!(matches!(TestOptions::load(&invalid), Err(UnitError::ParseConfig { .. })));
}

#[test]
fn test_options_toml_roundtrip_keeps_unset_event_loop() {
    let options = TestOptions::default().with_reporter(ReportOptions::new("log", ReportFormat::Json));
    let text = toml::to_string_pretty(&options).unwrap();
    assert!(!text.contains("use_event_loop"));
    let back: TestOptions = toml::from_str(&text).unwrap();
    assert_eq!(back, options);
}

#[test]
fn test_resolve_locale() {
    assert_eq!(async_unit::resolve_locale("zh-CN"), "zh-CN");
    assert_eq!(async_unit::resolve_locale("en-US"), "en");
    assert_eq!(async_unit::resolve_locale("fr-FR"), "en");
}
