//! # Error Types / 错误类型
//!
//! Errors surfaced by the library API. Callback bodies and reporters use
//! `anyhow`; these types cover configuration, runtime selection and suite
//! outcomes.
//!
//! 库 API 暴露的错误类型。回调和报告器使用 `anyhow`；
//! 这些类型涵盖配置、运行时选择和套件结果。

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring or launching a test suite.
/// 配置或启动测试套件时产生的错误。
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Failed to read options file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse options file {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid report target '{0}', expected 'console', 'log' or 'file:<dir>'")]
    InvalidReportTarget(String),

    #[error("Invalid report format '{0}', expected 'simple', 'junit', 'html' or 'json'")]
    InvalidReportFormat(String),

    #[error("No Tokio runtime is available but the options require one")]
    NoEventLoop,

    #[error("Failed to build a runtime for the test suite: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("The test suite did not complete within {0:?}")]
    Timeout(Duration),
}

/// An assertion made through a test context did not hold.
///
/// The failure has already been recorded on the running step when this value
/// is returned, so it may be ignored inside spawned tasks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    pub message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A finished suite had failing tests or suite-level errors.
/// 已完成的套件存在失败的测试或套件级错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Test suite '{suite}' failed: run: {run}, Failures: {failures}, Errors: {errors}")]
pub struct SuiteFailed {
    pub suite: String,
    pub run: usize,
    pub failures: usize,
    pub errors: usize,
}
