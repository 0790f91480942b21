// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_unit::reporting::{ReportEvent, Reporter};
use async_unit::{ReportFormat, ReportOptions, TestOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A writer whose bytes can be read back after the run.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Records every event it sees.
#[derive(Clone, Default)]
pub struct CollectingReporter {
    pub events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl CollectingReporter {
    pub fn boxed(&self) -> Box<dyn Reporter> {
        Box::new(self.clone())
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for CollectingReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Options that keep the console quiet: events go to `tracing` only.
pub fn quiet_options() -> TestOptions {
    TestOptions::default().with_reporter(ReportOptions::new("log", ReportFormat::Simple))
}

/// Quiet options with a short step timeout.
pub fn quiet_options_with_timeout(timeout: Duration) -> TestOptions {
    quiet_options().with_timeout(timeout)
}

/// An append-only trace of the steps that ran.
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}
