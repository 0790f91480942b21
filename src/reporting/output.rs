//! Where report text goes: standard output, a file per suite inside a
//! directory, or any caller supplied writer.

use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::infra::fs::create_report_file;

/// Destination of a text based reporter.
/// 文本报告器的输出目的地。
pub enum Destination {
    Stdout,
    /// `<dir>/<suite>.<ext>`, opened when the suite begins.
    Directory(PathBuf),
    /// A caller supplied sink, never colorized.
    Writer(Box<dyn Write + Send>),
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("Stdout"),
            Destination::Directory(dir) => f.debug_tuple("Directory").field(dir).finish(),
            Destination::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// A destination bound to one report extension.
pub(crate) struct ReportWriter {
    destination: Destination,
    extension: &'static str,
    file: Option<BufWriter<std::fs::File>>,
}

impl ReportWriter {
    pub(crate) fn new(destination: Destination, extension: &'static str) -> Self {
        Self {
            destination,
            extension,
            file: None,
        }
    }

    pub(crate) fn is_console(&self) -> bool {
        matches!(self.destination, Destination::Stdout)
    }

    /// Opens the report file of `suite_name` for directory destinations.
    pub(crate) fn begin(&mut self, suite_name: &str) -> Result<()> {
        if let Destination::Directory(dir) = &self.destination {
            let (file, path) = create_report_file(dir, suite_name, self.extension)?;
            debug!(path = %path.display(), "writing report");
            self.file = Some(BufWriter::new(file));
        }
        Ok(())
    }

    pub(crate) fn write_str(&mut self, text: &str) -> Result<()> {
        match &mut self.destination {
            Destination::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            Destination::Writer(writer) => {
                writer.write_all(text.as_bytes())?;
                writer.flush()?;
            }
            Destination::Directory(dir) => {
                let file = self
                    .file
                    .as_mut()
                    .with_context(|| format!("No report file open in {}", dir.display()))?;
                file.write_all(text.as_bytes())?;
                file.flush()?;
            }
        }
        Ok(())
    }

    /// Closes the current report file, if any.
    pub(crate) fn end(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().context("Failed to flush report file")?;
        }
        Ok(())
    }
}
