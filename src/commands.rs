//! # Commands Module / 命令模块
//!
//! Implementations of the `async-unit` subcommands.
//!
//! `async-unit` 子命令的实现。

pub mod check;
pub mod init;
pub mod render;
