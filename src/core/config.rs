//! # Options Module / 选项模块
//!
//! Run options for a test suite: the per-step timeout, how the execution
//! context is chosen, the output language and the reporters to notify.
//! Options can be built in code or loaded from a TOML file.
//!
//! 测试套件的运行选项：每个步骤的超时、执行上下文的选择方式、
//! 输出语言以及要通知的报告器。选项可以在代码中构建，也可以从 TOML 文件加载。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::UnitError;

/// Default step timeout: two minutes.
/// 默认步骤超时：两分钟。
pub const DEFAULT_TIMEOUT_MS: u64 = 2 * 60 * 1000;

/// Output format of a reporter.
/// 报告器的输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human readable lines, one per event.
    /// 人类可读的文本行，每个事件一行。
    #[default]
    Simple,
    /// A JUnit XML document written when the suite ends.
    /// 套件结束时写入的 JUnit XML 文档。
    Junit,
    /// A standalone HTML page written when the suite ends.
    /// 套件结束时写入的独立 HTML 页面。
    Html,
    /// One JSON event per line.
    /// 每行一个 JSON 事件。
    Json,
}

impl ReportFormat {
    /// File extension used when the report goes to a directory.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Simple => "txt",
            ReportFormat::Junit => "xml",
            ReportFormat::Html => "html",
            ReportFormat::Json => "jsonl",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(ReportFormat::Simple),
            "junit" => Ok(ReportFormat::Junit),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            _ => Err(UnitError::InvalidReportFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Simple => "simple",
            ReportFormat::Junit => "junit",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Where a reporter sends its output, parsed from [`ReportOptions::to`].
/// 报告器输出的目的地，由 [`ReportOptions::to`] 解析而来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    /// Standard output.
    Console,
    /// A file named after the suite inside this directory.
    File(PathBuf),
    /// `tracing` events.
    Log,
}

impl FromStr for ReportTarget {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "console" => Ok(ReportTarget::Console),
            "log" => Ok(ReportTarget::Log),
            other => match other.strip_prefix("file:") {
                Some(dir) if !dir.trim().is_empty() => {
                    Ok(ReportTarget::File(PathBuf::from(dir.trim())))
                }
                _ => Err(UnitError::InvalidReportTarget(s.to_string())),
            },
        }
    }
}

/// Configuration of one reporter.
/// 单个报告器的配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// `console`, `log` or `file:<dir>`.
    /// `console`、`log` 或 `file:<目录>`。
    #[serde(default = "default_target")]
    pub to: String,
    /// Output format / 输出格式
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            to: default_target(),
            format: ReportFormat::Simple,
        }
    }
}

impl ReportOptions {
    pub fn new(to: impl Into<String>, format: ReportFormat) -> Self {
        Self {
            to: to.into(),
            format,
        }
    }

    /// Parses the `to` field.
    pub fn target(&self) -> Result<ReportTarget, UnitError> {
        self.to.parse()
    }
}

fn default_target() -> String {
    "console".to_string()
}

/// Options controlling a test suite run.
/// 控制测试套件运行的选项。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOptions {
    /// Maximum time in milliseconds a single step (hook or test) may take
    /// before it fails with a timeout.
    /// 单个步骤（钩子或测试）在因超时失败前允许的最长时间（毫秒）。
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// `None` uses the current runtime when there is one, `Some(true)`
    /// requires one, `Some(false)` never uses it.
    /// `None` 表示存在当前运行时则使用，`Some(true)` 表示必须存在，`Some(false)` 表示从不使用。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_event_loop: Option<bool>,

    /// The language for report messages (e.g., "en", "zh-CN").
    /// 报告消息的语言（例如 "en", "zh-CN"）。
    #[serde(default = "default_language")]
    pub language: String,

    /// Reporters to notify. Empty means a single console reporter in the
    /// simple format.
    /// 要通知的报告器。为空时表示使用单个简单格式的控制台报告器。
    #[serde(default)]
    pub reporters: Vec<ReportOptions>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            use_event_loop: None,
            language: default_language(),
            reporters: Vec::new(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_language() -> String {
    "en".to_string()
}

impl TestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a TOML file.
    /// 从 TOML 文件加载选项。
    pub fn load(path: &Path) -> Result<Self, UnitError> {
        let content = fs::read_to_string(path).map_err(|source| UnitError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| UnitError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_use_event_loop(mut self, use_event_loop: Option<bool>) -> Self {
        self.use_event_loop = use_event_loop;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_reporter(mut self, reporter: ReportOptions) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// The reporters actually used for a run, applying the console default.
    pub fn effective_reporters(&self) -> Vec<ReportOptions> {
        if self.reporters.is_empty() {
            vec![ReportOptions::default()]
        } else {
            self.reporters.clone()
        }
    }

    /// Checks every reporter target and returns the parsed targets.
    pub fn validate(&self) -> Result<Vec<(ReportTarget, ReportFormat)>, UnitError> {
        self.effective_reporters()
            .iter()
            .map(|r| Ok((r.target()?, r.format)))
            .collect()
    }
}
