//! Reports a run as `tracing` events on the `async_unit::report` target.

use anyhow::Result;
use tracing::{error, info, warn};

use crate::reporting::{ReportEvent, Reporter};

#[derive(Debug, Default)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for LogReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        match event {
            ReportEvent::BeginSuite { name } => {
                info!(target: "async_unit::report", suite = %name, "begin test suite");
            }
            ReportEvent::BeginTest { name } => {
                info!(target: "async_unit::report", test = %name, "begin test");
            }
            ReportEvent::EndTest { result } => match &result.failure {
                None => info!(
                    target: "async_unit::report",
                    test = %result.name,
                    duration_ms = result.duration.as_millis() as u64,
                    "passed"
                ),
                Some(failure) => warn!(
                    target: "async_unit::report",
                    test = %result.name,
                    kind = ?failure.kind,
                    message = %failure.message,
                    "failed"
                ),
            },
            ReportEvent::Error { failure } => {
                error!(
                    target: "async_unit::report",
                    kind = ?failure.kind,
                    message = %failure.message,
                    "suite error"
                );
            }
            ReportEvent::EndSuite { summary } => {
                info!(
                    target: "async_unit::report",
                    suite = %summary.name,
                    run = summary.run(),
                    failures = summary.failures(),
                    errors = summary.errors(),
                    "end test suite"
                );
            }
        }
        Ok(())
    }
}
