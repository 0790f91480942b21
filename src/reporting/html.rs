//! # HTML Reporting Module / HTML 报告模块
//!
//! This module handles the generation of HTML test reports.
//! It creates styled HTML pages with suite statistics, a detailed results
//! table and collapsible failure messages.
//!
//! 此模块处理 HTML 测试报告的生成。
//! 它创建带有套件统计、详细结果表格和可折叠失败消息的样式化 HTML 页面。

use anyhow::Result;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::core::models::{SuiteSummary, TestResult};
use crate::infra::t;
use crate::reporting::output::{Destination, ReportWriter};
use crate::reporting::{ReportEvent, Reporter};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Buffers nothing but the destination; the page is rendered from the
/// summary carried by the `EndSuite` event.
pub struct HtmlReporter {
    out: ReportWriter,
    locale: String,
}

impl HtmlReporter {
    pub fn new(destination: Destination, locale: &str) -> Self {
        Self {
            out: ReportWriter::new(destination, "html"),
            locale: locale.to_string(),
        }
    }
}

impl Reporter for HtmlReporter {
    fn handle(&mut self, event: &ReportEvent) -> Result<()> {
        match event {
            ReportEvent::BeginSuite { name } => self.out.begin(name),
            ReportEvent::EndSuite { summary } => {
                let page = render(summary, &self.locale);
                self.out.write_str(&page.into_string())?;
                self.out.end()
            }
            _ => Ok(()),
        }
    }
}

/// Generates a comprehensive HTML page from a suite summary.
///
/// 从套件摘要生成综合的 HTML 页面。
///
/// # Arguments / 参数
/// * `summary` - The finished suite / 已完成的套件
/// * `locale` - The locale to use for internationalization
///              用于国际化使用的语言环境
pub fn render(summary: &SuiteSummary, locale: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale, name = &summary.name)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale, name = &summary.name)) }
                div class="summary-container" {
                    (summary_item(summary.run(), "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(summary.passed(), "passed-text", &t!("html_report.summary.passed", locale = locale)))
                    (summary_item(summary.failures(), "failed-text", &t!("html_report.summary.failed", locale = locale)))
                    (summary_item(summary.errors(), "error-text", &t!("html_report.summary.errors", locale = locale)))
                }
                @if !summary.suite_errors.is_empty() {
                    div class="suite-errors" {
                        h2 { (t!("html_report.suite_errors", locale = locale)) }
                        ul {
                            @for failure in &summary.suite_errors {
                                li { (failure.message) }
                            }
                        }
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale)) }
                            th class="status-col" { (t!("html_report.table.header.status", locale = locale)) }
                            th class="duration-cell" { (t!("html_report.table.header.duration", locale = locale)) }
                        }
                    }
                    tbody {
                        @for (i, result) in summary.results.iter().enumerate() {
                            (result_rows(i, result, locale))
                        }
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    }
}

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn status_label(result: &TestResult, locale: &str) -> String {
    if result.succeeded() {
        t!("report.status_passed", locale = locale).to_string()
    } else if result.is_timeout() {
        t!("report.status_timeout", locale = locale).to_string()
    } else if result.is_error() {
        t!("report.status_error", locale = locale).to_string()
    } else {
        t!("report.status_failed", locale = locale).to_string()
    }
}

fn result_rows(index: usize, result: &TestResult, locale: &str) -> Markup {
    let output_id = format!("output-{index}");
    html! {
        tr {
            td { (result.name) }
            td class="status-col" {
                div class={ "status-cell " (result.get_status_class()) } { (status_label(result, locale)) }
                @if result.failed() {
                    div class="output-toggle" onclick={ "toggleOutput('" (output_id) "')" } {
                        (t!("html_report.toggle_output", locale = locale))
                    }
                }
            }
            td class="duration-cell" { (format!("{:.3}s", result.duration.as_secs_f64())) }
        }
        @if let Some(failure) = &result.failure {
            tr id=(output_id) style="display:none;" {
                td colspan="3" { pre class="output-content" { (failure.message) } }
            }
        }
    }
}
