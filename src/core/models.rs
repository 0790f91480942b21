//! # Data Models Module / 数据模型模块
//!
//! This module defines the result types produced by a suite run: the failure
//! of a step, the result of a single test case and the summary of a suite.
//! All of them are serializable so they can travel through the json reporter.
//!
//! 此模块定义套件运行产生的结果类型：步骤的失败、单个测试用例的结果以及套件摘要。
//! 它们都可以序列化，以便通过 json 报告器传递。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::AssertionError;

/// Enumerates the possible reasons for a step failure.
/// This drives the split between failures and errors in reports.
/// 枚举步骤失败的可能原因。
/// 这决定了报告中失败与错误的划分。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureKind {
    /// An assertion did not hold.
    /// 断言未成立。
    Assertion,
    /// The callback returned an error, panicked or misused an `Async`.
    /// 回调返回错误、发生 panic 或错误使用了 `Async`。
    Error,
    /// The step did not finish within the configured timeout.
    /// 步骤未在配置的超时时间内完成。
    Timeout,
    /// The run was cancelled while the step was pending.
    /// 步骤挂起时运行被取消。
    Cancelled,
}

/// The first failure recorded by a step.
/// 步骤记录的第一个失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Assertion,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Error,
            message: message.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: format!("Timed out after {} ms", after.as_millis()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            kind: FailureKind::Cancelled,
            message: "Test suite run was cancelled".to_string(),
        }
    }

    /// Classifies an error returned by a callback.
    /// 对回调返回的错误进行分类。
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<AssertionError>() {
            Some(assertion) => Failure::assertion(assertion.message.clone()),
            None => Failure::error(format!("{err:#}")),
        }
    }

    /// Builds a failure from a panic payload.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "callback panicked".to_string()
        };
        Failure::error(format!("panicked: {message}"))
    }

    /// Everything except a failed assertion counts as an error.
    pub fn is_error(&self) -> bool {
        self.kind != FailureKind::Assertion
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Represents the final result of a single test case execution.
/// 表示单个测试用例执行的最终结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// The name of the test case / 测试用例名称
    pub name: String,
    /// When the case started (before `before_each`) / 用例开始时间
    pub begin_time: DateTime<Utc>,
    /// Time spent in `before_each`, the test and `after_each`
    /// 在 `before_each`、测试和 `after_each` 中花费的时间
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// The first failure of the case, if any / 用例的第一个失败（如有）
    pub failure: Option<Failure>,
}

impl TestResult {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Checks if the result counts as a failure (a failed assertion).
    pub fn is_assertion_failure(&self) -> bool {
        matches!(&self.failure, Some(f) if f.kind == FailureKind::Assertion)
    }

    /// Checks if the result counts as an error.
    pub fn is_error(&self) -> bool {
        matches!(&self.failure, Some(f) if f.is_error())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(&self.failure, Some(f) if f.kind == FailureKind::Timeout)
    }

    /// Gets the appropriate CSS class for the test status.
    pub fn get_status_class(&self) -> &'static str {
        match &self.failure {
            None => "status-Passed",
            Some(f) => match f.kind {
                FailureKind::Assertion => "status-Failed",
                FailureKind::Timeout => "status-Timeout",
                FailureKind::Error | FailureKind::Cancelled => "status-Error",
            },
        }
    }
}

/// The outcome of a whole suite run.
/// 整个套件运行的结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub name: String,
    /// One entry per executed test case (repetitions included).
    /// 每个已执行的测试用例一个条目（包括重复执行）。
    pub results: Vec<TestResult>,
    /// Failures of the `before` and `after` hooks, and cancellation.
    /// `before` 和 `after` 钩子的失败以及取消。
    pub suite_errors: Vec<Failure>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub cancelled: bool,
}

impl SuiteSummary {
    pub fn run(&self) -> usize {
        self.results.len()
    }

    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.is_assertion_failure())
            .count()
    }

    pub fn errors(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count() + self.suite_errors.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0 && self.errors() == 0
    }
}

/// Serializes a `Duration` as whole milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
