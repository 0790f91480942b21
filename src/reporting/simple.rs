//! # Simple Reporting Module / 简单报告模块
//!
//! This module renders a suite run as one line per event, with
//! internationalization support. On the console the lines are colored.
//!
//! 此模块以每个事件一行的方式渲染套件运行，支持国际化。在控制台上输出为彩色。
//!
//! # Output Format / 输出格式
//! ```text
//! Begin test suite the_test_suite
//! Begin test my_test
//! Passed my_test
//! End test suite the_test_suite , run: 1, Failures: 0, Errors: 0
//! ```

use anyhow::Result;
use colored::*;

use crate::core::models::{SuiteSummary, TestResult};
use crate::infra::t;
use crate::reporting::output::{Destination, ReportWriter};
use crate::reporting::{ReportEvent, Reporter};

/// Line oriented reporter.
pub struct SimpleReporter {
    out: ReportWriter,
    locale: String,
}

impl SimpleReporter {
    pub fn new(destination: Destination, locale: &str) -> Self {
        Self {
            out: ReportWriter::new(destination, "txt"),
            locale: locale.to_string(),
        }
    }

    fn line(&mut self, text: String) -> Result<()> {
        self.out.write_str(&format!("{text}\n"))
    }

    fn paint(&self, text: String, style: fn(String) -> ColoredString) -> String {
        if self.out.is_console() {
            style(text).to_string()
        } else {
            text
        }
    }

    fn end_test(&mut self, result: &TestResult) -> Result<()> {
        let locale = self.locale.clone();
        match &result.failure {
            None => {
                let text = t!("report.test_passed", locale = &locale, name = &result.name).to_string();
                let text = self.paint(text, |s| s.green());
                self.line(text)
            }
            Some(failure) => {
                let text = t!("report.test_failed", locale = &locale, name = &result.name).to_string();
                let text = self.paint(text, |s| s.red());
                self.line(text)?;
                self.line(format!("  {}", failure.message))
            }
        }
    }

    fn end_suite(&mut self, summary: &SuiteSummary) -> Result<()> {
        let text = t!(
            "report.end_suite",
            locale = &self.locale,
            name = &summary.name,
            run = summary.run(),
            failures = summary.failures(),
            errors = summary.errors()
        )
        .to_string();
        let text = if summary.is_success() {
            self.paint(text, |s| s.green().bold())
        } else {
            self.paint(text, |s| s.red().bold())
        };
        self.line(text)?;
        self.out.end()
    }
}

impl Reporter for SimpleReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        match event {
            ReportEvent::BeginSuite { name } => {
                self.out.begin(name)?;
                let text = t!("report.begin_suite", locale = &self.locale, name = name).to_string();
                let text = self.paint(text, |s| s.bold());
                self.line(text)
            }
            ReportEvent::BeginTest { name } => {
                let text = t!("report.begin_test", locale = &self.locale, name = name).to_string();
                self.line(text)
            }
            ReportEvent::EndTest { result } => self.end_test(result),
            ReportEvent::Error { failure } => {
                let text = t!(
                    "report.suite_error",
                    locale = &self.locale,
                    message = &failure.message
                )
                .to_string();
                let text = self.paint(text, |s| s.red());
                self.line(text)
            }
            ReportEvent::EndSuite { summary } => self.end_suite(summary),
        }
    }
}
