//! # Options Initialization Module / 选项初始化模块
//!
//! This module provides an interactive command-line wizard that writes a
//! `UnitTest.toml` options file: the step timeout, how the execution context
//! is chosen, and which reporters to notify.
//!
//! 此模块提供交互式命令行向导，用于写出 `UnitTest.toml` 选项文件：
//! 步骤超时、执行上下文的选择方式以及要通知的报告器。
//!
//! ## Features / 功能特性
//!
//! - **Interactive Wizard**: Step-by-step guidance for the options
//! - **Reporter Selection**: Console, log and file reporters in every format
//! - **Overwrite Protection**: Confirmation prompts before overwriting an existing file
//!
//! - **交互式向导**: 选项设置的逐步指导
//! - **报告器选择**: 控制台、日志以及各种格式的文件报告器
//! - **覆盖保护**: 覆盖现有文件前的确认提示

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{ReportFormat, ReportOptions, TestOptions, DEFAULT_TIMEOUT_MS};
use crate::t;

/// Default directory of file reporters created by the wizard.
const DEFAULT_REPORT_DIR: &str = "target/test-reports";

/// Runs the wizard and writes the options to `config_path`.
///
/// In non-interactive mode the default options are written without any
/// prompt, replacing an existing file.
///
/// 运行向导并将选项写入 `config_path`。
/// 非交互模式下直接写出默认选项，不进行任何提示，并覆盖已有文件。
pub fn run_init_wizard(language: &str, config_path: &Path, non_interactive: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if non_interactive {
        let options = TestOptions::default().with_language(language);
        return write_config(config_path, &options, language);
    }

    println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
    println!("{}", t!("init_wizard_description", locale = language));

    if config_path.exists() {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init_overwrite_prompt", locale = language, path = config_path.display()))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let timeout_ms: u64 = Input::with_theme(&theme)
        .with_prompt(t!("init_timeout_prompt", locale = language))
        .default(DEFAULT_TIMEOUT_MS)
        .interact_text()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    let modes = [
        t!("event_loop_auto", locale = language),
        t!("event_loop_require", locale = language),
        t!("event_loop_never", locale = language),
    ];
    let mode = Select::with_theme(&theme)
        .with_prompt(t!("init_event_loop_prompt", locale = language))
        .items(&modes)
        .default(0)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    let use_event_loop = match mode {
        1 => Some(true),
        2 => Some(false),
        _ => None,
    };

    let choices = [
        ("console", ReportFormat::Simple, t!("init_reporter_console", locale = language)),
        ("log", ReportFormat::Simple, t!("init_reporter_log", locale = language)),
        ("file", ReportFormat::Junit, t!("init_reporter_junit", locale = language)),
        ("file", ReportFormat::Html, t!("init_reporter_html", locale = language)),
        ("file", ReportFormat::Json, t!("init_reporter_json", locale = language)),
    ];
    let selections = MultiSelect::with_theme(&theme)
        .with_prompt(t!("init_reporter_selection_prompt", locale = language))
        .items(&choices.iter().map(|c| c.2.clone()).collect::<Vec<_>>())
        .defaults(&[true, false, false, false, false])
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;

    if selections.is_empty() {
        println!("{}", t!("init_no_reporters_selected", locale = language).yellow());
    }

    let needs_dir = selections.iter().any(|&i| choices[i].0 == "file");
    let report_dir: String = if needs_dir {
        Input::with_theme(&theme)
            .with_prompt(t!("init_report_dir_prompt", locale = language))
            .default(DEFAULT_REPORT_DIR.to_string())
            .interact_text()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?
    } else {
        DEFAULT_REPORT_DIR.to_string()
    };

    let mut options = TestOptions::default()
        .with_language(language)
        .with_use_event_loop(use_event_loop);
    options.timeout_ms = timeout_ms;
    for i in selections {
        let (kind, format, _) = &choices[i];
        let to = match *kind {
            "file" => format!("file:{report_dir}"),
            other => other.to_string(),
        };
        options = options.with_reporter(ReportOptions::new(to, *format));
    }

    write_config(config_path, &options, language)
}

fn write_config(path: &Path, options: &TestOptions, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(options)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string)
        .with_context(|| t!("init_write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language, path = path.display()));

    Ok(())
}
