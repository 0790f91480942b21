//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as naming and creating report files inside a report directory.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如在报告目录中命名和创建报告文件。

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Turns a suite name into something safe to use as a file stem.
///
/// # Arguments
/// * `name` - Name of the test suite
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "suite".to_string()
    } else {
        sanitized
    }
}

/// Computes the path of the report of `suite_name` inside `dir`.
pub fn report_file_path(dir: &Path, suite_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_file_name(suite_name), extension))
}

/// Creates (or truncates) the report file of a suite, creating `dir` first
/// when it does not exist.
///
/// # Returns
/// The opened file and its path
pub fn create_report_file(dir: &Path, suite_name: &str, extension: &str) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;
    let path = report_file_path(dir, suite_name, extension);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    Ok((file, path))
}

/// Gets the absolute path from a potentially relative path.
///
/// # Arguments
/// * `path` - Path to canonicalize
///
/// # Returns
/// Canonicalized absolute path, or an error if the path doesn't exist
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve path: {}", path.display()))
}
