//! # Core Module / 核心模块
//!
//! This module contains the core functionality of async-unit: options,
//! result models, the test context, suites, the execution engine and the
//! completion handle.
//!
//! 此模块包含 async-unit 的核心功能：选项、结果模型、测试上下文、
//! 测试套件、执行引擎以及完成句柄。

pub mod completion;
pub mod config;
pub mod context;
pub mod execution;
pub mod models;
pub(crate) mod runner;
pub mod suite;

// Re-exports
pub use completion::TestCompletion;
pub use config::{ReportFormat, ReportOptions, ReportTarget, TestOptions};
pub use context::{Async, TestContext};
pub use models::{Failure, FailureKind, SuiteSummary, TestResult};
pub use suite::{StepResult, TestCase, TestCaseRunner, TestSuite};
