//! # Render Command Module / 渲染命令模块
//!
//! Replays a JSON event log, as written by the `json` report format, into
//! any other reporter.
//!
//! 将 `json` 报告格式写出的 JSON 事件日志重放到任意其他报告器中。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::config::{ReportFormat, ReportTarget};
use crate::reporting::json::parse_events;
use crate::reporting::reporter_for;
use crate::t;

pub fn execute(input: &Path, format: &str, to: &str, language: &str) -> Result<()> {
    let format: ReportFormat = format.parse()?;
    let target: ReportTarget = to.parse()?;

    let log = fs::read_to_string(input)
        .with_context(|| t!("render_read_failed", locale = language, path = input.display()).to_string())?;
    let events = parse_events(&log)?;
    debug!(events = events.len(), %format, "replaying event log");

    let mut reporter = reporter_for(target, format, language);
    for event in &events {
        reporter.handle(event)?;
    }
    Ok(())
}
