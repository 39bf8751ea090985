// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The `moonlift` binary: translate Lua files and projects to Python.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use console::style;
use moonlift_cli::config::Config;
use moonlift_cli::job::{run_path, JobOptions};
use moonlift_cli::watcher::watch_loop;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moonlift")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Translate Lua files and projects to Python", long_about = None)]
struct Cli {
    /// Path to a .lua file or a directory tree
    path: PathBuf,

    /// Output destination (file or directory); defaults next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose diagnostics (per-file warning reports)
    #[arg(short, long)]
    verbose: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Promote recoverable warnings to errors
    #[arg(long)]
    strict: bool,

    /// Dump the lowered target AST as JSON instead of source
    #[arg(long)]
    emit_ast: bool,

    /// Stay resident and retranslate on change
    #[arg(long)]
    watch: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !cli.path.exists() {
        eprintln!(
            "{} no such file or directory: {}",
            style("error").red().bold(),
            cli.path.display()
        );
        return ExitCode::from(2);
    }

    let config_dir = if cli.path.is_dir() {
        cli.path.clone()
    } else {
        cli.path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    };
    let config = match Config::load(&config_dir) {
        Ok(config) => config,
        Err(error) => {
            eprintln!(
                "{} invalid moonlift.toml: {:#}",
                style("error").red().bold(),
                error
            );
            return ExitCode::from(2);
        }
    };

    if let Some(name) = &config.project.name {
        tracing::info!("project: {}", name);
    }

    let options = JobOptions {
        output: cli
            .output
            .or_else(|| config.build.output_dir.as_ref().map(PathBuf::from)),
        strict: cli.strict || config.build.strict,
        emit_ast: cli.emit_ast,
        verbose: cli.verbose,
        extension: config.build.extension.clone(),
    };

    if cli.watch {
        return match watch_loop(&cli.path, &options, config.watch.debounce_ms) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{} {:#}", style("error").red().bold(), error);
                ExitCode::FAILURE
            }
        };
    }

    match run_path(&cli.path, &options) {
        Ok(report) if report.success() => {
            if cli.verbose {
                eprintln!("translated {} file(s)", report.translated);
            }
            ExitCode::SUCCESS
        }
        Ok(report) => {
            eprintln!(
                "{} {} of {} file(s) failed",
                style("error").red().bold(),
                report.failed.len(),
                report.translated + report.failed.len()
            );
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{} {:#}", style("error").red().bold(), error);
            ExitCode::FAILURE
        }
    }
}
