//! JSON event log: every [`ReportEvent`] serialized on its own line, written
//! as it happens. The `render` command replays such a log into any other
//! format.

use anyhow::{Context, Result};

use crate::reporting::output::{Destination, ReportWriter};
use crate::reporting::{ReportEvent, Reporter};

pub struct JsonReporter {
    out: ReportWriter,
}

impl JsonReporter {
    pub fn new(destination: Destination) -> Self {
        Self {
            out: ReportWriter::new(destination, "jsonl"),
        }
    }
}

impl Reporter for JsonReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        if let ReportEvent::BeginSuite { name } = event {
            self.out.begin(name)?;
        }
        let line = serde_json::to_string(event).context("Failed to serialize report event")?;
        self.out.write_str(&format!("{line}\n"))?;
        if matches!(event, ReportEvent::EndSuite { .. }) {
            self.out.end()?;
        }
        Ok(())
    }
}

/// Parses a JSON event log. Blank lines are skipped.
pub fn parse_events(log: &str) -> Result<Vec<ReportEvent>> {
    log.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid report event on line {}", i + 1))
        })
        .collect()
}
