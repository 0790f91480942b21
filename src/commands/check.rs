//! # Check Command Module / 检查命令模块
//!
//! Loads an options file, validates every reporter target and prints the
//! options a suite run would use.
//!
//! 加载选项文件，校验每个报告器目标，并打印套件运行将使用的选项。

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::core::config::{ReportTarget, TestOptions};
use crate::infra::fs::absolute_path;
use crate::t;

pub fn execute(config_path: &Path, language: &str) -> Result<()> {
    let options = TestOptions::load(config_path)?;
    let targets = options.validate()?;

    let shown = absolute_path(config_path).unwrap_or_else(|_| config_path.to_path_buf());
    println!(
        "{} {}",
        "✔".green(),
        t!("check_valid", locale = language, path = shown.display()).bold()
    );
    println!("  {}", t!("check_timeout", locale = language, ms = options.timeout_ms));

    let mode = match options.use_event_loop {
        None => t!("event_loop_auto", locale = language),
        Some(true) => t!("event_loop_require", locale = language),
        Some(false) => t!("event_loop_never", locale = language),
    };
    println!("  {}", t!("check_event_loop", locale = language, mode = mode));
    println!("  {}", t!("check_language", locale = language, lang = &options.language));

    println!("  {}", t!("check_reporters", locale = language, count = targets.len()));
    for (target, format) in targets {
        let to = match target {
            ReportTarget::Console => "console".to_string(),
            ReportTarget::Log => "log".to_string(),
            ReportTarget::File(dir) => format!("file:{}", dir.display()),
        };
        println!("    - {} ({})", to.cyan(), format);
    }
    Ok(())
}
