// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::{commands, resolve_locale, t};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn build_cli(locale: &str) -> Command {
    Command::new("async-unit")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg_output", locale = locale).to_string())
                        .value_name("PATH")
                        .default_value("UnitTest.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("check")
                .about(t!("cmd_check_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value("UnitTest.toml")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("render")
                .about(t!("cmd_render_about", locale = locale).to_string())
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help(t!("arg_input", locale = locale).to_string())
                        .value_name("INPUT")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help(t!("arg_format", locale = locale).to_string())
                        .value_name("FORMAT")
                        .value_parser(["simple", "junit", "html", "json"])
                        .default_value("simple")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help(t!("arg_to", locale = locale).to_string())
                        .value_name("TARGET")
                        .default_value("console")
                        .action(ArgAction::Set),
                ),
        )
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    // Every path argument is either required or has a default.
    matches.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn string_arg(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let requested = pre_parse_language();
    let detected = requested.is_none();
    let raw = requested
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let language = resolve_locale(&raw).to_string();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("init", init_matches)) => {
            if detected {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(
                &language,
                &path_arg(init_matches, "output"),
                init_matches.get_flag("non-interactive"),
            )?;
        }
        Some(("check", check_matches)) => {
            commands::check::execute(&path_arg(check_matches, "config"), &language)?;
        }
        Some(("render", render_matches)) => {
            commands::render::execute(
                &path_arg(render_matches, "input"),
                &string_arg(render_matches, "format"),
                &string_arg(render_matches, "to"),
                &language,
            )?;
        }
        _ => {
            // Clap has already printed help info.
        }
    }
    Ok(())
}
