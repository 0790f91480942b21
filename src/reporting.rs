//! # Reporting Module / 报告模块
//!
//! Reporters observe a suite run through a stream of [`ReportEvent`]s and
//! render it: console text, JUnit XML, HTML, a JSON event log, or `tracing`
//! events. A failing reporter is logged and never fails the suite.
//!
//! 报告器通过 [`ReportEvent`] 事件流观察套件运行并进行渲染：控制台文本、JUnit XML、
//! HTML、JSON 事件日志或 `tracing` 事件。报告器出错只会被记录，不会导致套件失败。

pub mod html;
pub mod json;
pub mod junit;
pub mod log;
pub mod output;
pub mod simple;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::{ReportFormat, ReportOptions, ReportTarget};
use crate::core::models::{Failure, SuiteSummary, TestResult};
use crate::error::UnitError;

pub use output::Destination;

/// One step of the progress of a suite run.
/// 套件运行进度中的一个事件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    BeginSuite { name: String },
    BeginTest { name: String },
    EndTest { result: TestResult },
    /// A suite-level failure: `before`, `after` or cancellation.
    Error { failure: Failure },
    EndSuite { summary: SuiteSummary },
}

/// Observes a suite run.
/// 观察套件运行。
pub trait Reporter: Send {
    fn handle(&mut self, event: &ReportEvent) -> anyhow::Result<()>;
}

/// Creates the reporter described by `options`.
///
/// # Errors
/// Returns an error if the target string cannot be parsed.
pub fn create_reporter(options: &ReportOptions, locale: &str) -> Result<Box<dyn Reporter>, UnitError> {
    let target = options.target()?;
    Ok(reporter_for(target, options.format, locale))
}

/// Builds a reporter for an already parsed target.
pub fn reporter_for(target: ReportTarget, format: ReportFormat, locale: &str) -> Box<dyn Reporter> {
    let destination = match target {
        ReportTarget::Log => return Box::new(log::LogReporter::new()),
        ReportTarget::Console => Destination::Stdout,
        ReportTarget::File(dir) => Destination::Directory(dir),
    };
    with_destination(destination, format, locale)
}

/// Builds a reporter writing `format` to `destination`.
pub fn with_destination(destination: Destination, format: ReportFormat, locale: &str) -> Box<dyn Reporter> {
    match format {
        ReportFormat::Simple => Box::new(simple::SimpleReporter::new(destination, locale)),
        ReportFormat::Junit => Box::new(junit::JunitReporter::new(destination)),
        ReportFormat::Html => Box::new(html::HtmlReporter::new(destination, locale)),
        ReportFormat::Json => Box::new(json::JsonReporter::new(destination)),
    }
}

/// Fans events out to every reporter of a run.
pub(crate) struct ReportDispatcher {
    reporters: Vec<Box<dyn Reporter>>,
}

impl ReportDispatcher {
    pub(crate) fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }

    pub(crate) fn dispatch(&mut self, event: &ReportEvent) {
        for reporter in &mut self.reporters {
            if let Err(e) = reporter.handle(event) {
                warn!(error = %format!("{e:#}"), "reporter failed to handle event");
            }
        }
    }
}
