//! # async-unit Library / async-unit 库
//!
//! An asynchronous unit-testing framework built on Tokio. Test suites group
//! named test cases with `before`, `after`, `before_each` and `after_each`
//! hooks. Each callback gets a [`TestContext`] carrying assertions, shared
//! data and [`Async`] completion tokens, so a test finishes only when the
//! asynchronous work it started has completed.
//!
//! 基于 Tokio 的异步单元测试框架。测试套件将具名测试用例与 `before`、`after`、
//! `before_each`、`after_each` 钩子组合在一起。每个回调都会获得一个 [`TestContext`]，
//! 其中包含断言、共享数据以及 [`Async`] 完成令牌，因此测试只有在其启动的异步工作
//! 全部完成后才会结束。
//!
//! ## Modules / 模块
//!
//! - `core` - Suites, the test context and the execution engine
//! - `reporting` - Report events and the simple, JUnit, HTML, JSON and log reporters
//! - `infra` - File system helpers for report files
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 测试套件、测试上下文和执行引擎
//! - `reporting` - 报告事件以及 simple、JUnit、HTML、JSON 和日志报告器
//! - `infra` - 报告文件相关的文件系统辅助功能
//! - `cli` - 命令行接口和命令
//!
//! ```no_run
//! use async_unit::TestSuite;
//! use std::time::Duration;
//!
//! let mut suite = TestSuite::create("timers");
//! suite.test("fires", |ctx| {
//!     let done = ctx.new_async();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         done.complete();
//!     });
//!     Ok(())
//! });
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::{
    Async, ReportFormat, ReportOptions, ReportTarget, StepResult, TestCase, TestCaseRunner,
    TestCompletion, TestContext, TestOptions, TestSuite,
};
pub use error::{AssertionError, SuiteFailed, UnitError};
pub use infra::t;
pub use reporting::{ReportEvent, Reporter};

/// Maps a requested locale onto one the crate ships translations for.
///
/// It attempts to match the full locale (e.g., "zh-CN"), then just the
/// language code (e.g., "en" from "en-US"), and finally falls back to "en".
///
/// 将请求的语言环境映射到本 crate 提供翻译的语言环境。
pub fn resolve_locale(locale: &str) -> &str {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    }
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
