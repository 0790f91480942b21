//! JUnit XML reporter. Results are buffered and the document is written when
//! the suite ends.

use anyhow::Result;
use std::fmt::Write as _;

use crate::core::models::{Failure, SuiteSummary, TestResult};
use crate::reporting::output::{Destination, ReportWriter};
use crate::reporting::{ReportEvent, Reporter};

pub struct JunitReporter {
    out: ReportWriter,
}

impl JunitReporter {
    pub fn new(destination: Destination) -> Self {
        Self {
            out: ReportWriter::new(destination, "xml"),
        }
    }
}

impl Reporter for JunitReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        match event {
            ReportEvent::BeginSuite { name } => self.out.begin(name),
            ReportEvent::EndSuite { summary } => {
                self.out.write_str(&render(summary)?)?;
                self.out.end()
            }
            _ => Ok(()),
        }
    }
}

/// Renders a summary as a JUnit `<testsuite>` document.
pub fn render(summary: &SuiteSummary) -> Result<String> {
    let mut xml = String::new();
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        xml,
        r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}" time="{:.3}">"#,
        escape(&summary.name),
        summary.run(),
        summary.failures(),
        summary.errors(),
        summary.duration.as_secs_f64()
    )?;
    for result in &summary.results {
        write_case(&mut xml, &summary.name, result)?;
    }
    if !summary.suite_errors.is_empty() {
        writeln!(xml, "  <system-err>")?;
        for failure in &summary.suite_errors {
            writeln!(xml, "{}", escape(&failure.message))?;
        }
        writeln!(xml, "  </system-err>")?;
    }
    writeln!(xml, "</testsuite>")?;
    Ok(xml)
}

fn write_case(xml: &mut String, suite: &str, result: &TestResult) -> Result<()> {
    let open = format!(
        r#"  <testcase name="{}" classname="{}" time="{:.3}""#,
        escape(&result.name),
        escape(suite),
        result.duration.as_secs_f64()
    );
    match &result.failure {
        None => writeln!(xml, "{open}/>")?,
        Some(failure) => {
            writeln!(xml, "{open}>")?;
            write_failure(xml, failure)?;
            writeln!(xml, "  </testcase>")?;
        }
    }
    Ok(())
}

fn write_failure(xml: &mut String, failure: &Failure) -> Result<()> {
    let tag = if failure.is_error() { "error" } else { "failure" };
    writeln!(
        xml,
        r#"    <{tag} type="{:?}" message="{}">{}</{tag}>"#,
        failure.kind,
        escape(&failure.message),
        escape(&failure.message)
    )?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
