// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Translation job execution.
//!
//! A job is either a single `.lua` file or a directory tree. Directory
//! jobs walk the tree, translate every Lua file through a shared
//! content-addressed cache (vendored duplicates translate once), mirror
//! the layout under the output root, and keep going past per-file
//! failures; the report carries every failure for the exit code and the
//! summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use globset::{Glob, GlobSet, GlobSetBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use moonlift::{parse, Options, TranslationCache, Translator};
use tracing::{debug, info};

/// Options for one job run, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Explicit output file or directory.
    pub output: Option<PathBuf>,
    /// Promote recoverable warnings to errors.
    pub strict: bool,
    /// Dump the lowered target AST as JSON instead of source.
    pub emit_ast: bool,
    /// Print per-file warning reports.
    pub verbose: bool,
    /// Extension for emitted files.
    pub extension: String,
}

impl Default for JobOptions {
    fn default() -> Self {
        JobOptions {
            output: None,
            strict: false,
            emit_ast: false,
            verbose: false,
            extension: "py".to_string(),
        }
    }
}

/// Outcome of a job run.
#[derive(Debug, Default)]
pub struct JobReport {
    /// Files translated successfully.
    pub translated: usize,
    /// Per-file failures, with rendered messages.
    pub failed: Vec<(PathBuf, String)>,
}

impl JobReport {
    /// True when every file translated.
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Translates a file or directory tree.
pub fn run_path(path: &Path, options: &JobOptions) -> anyhow::Result<JobReport> {
    let cache = TranslationCache::new(256);
    if path.is_dir() {
        run_directory(path, options, &cache)
    } else {
        let mut report = JobReport::default();
        let output = options
            .output
            .clone()
            .unwrap_or_else(|| sibling_output(path, &options.extension, options.emit_ast));
        match translate_one(path, &output, options, &cache) {
            Ok(()) => report.translated += 1,
            Err(error) => report.failed.push((path.to_path_buf(), format!("{:#}", error))),
        }
        Ok(report)
    }
}

fn run_directory(
    root: &Path,
    options: &JobOptions,
    cache: &TranslationCache,
) -> anyhow::Result<JobReport> {
    let output_root = options
        .output
        .clone()
        .unwrap_or_else(|| root.to_path_buf());
    let files = collect_lua_files(root)?;
    info!("translating {} files under {}", files.len(), root.display());

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .expect("static progress template"),
    );

    let mut report = JobReport::default();
    for file in files {
        bar.set_message(
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let output = mirrored_output(&file, root, &output_root, options);
        match translate_one(&file, &output, options, cache) {
            Ok(()) => report.translated += 1,
            Err(error) => {
                let message = format!("{:#}", error);
                eprintln!(
                    "{} {}: {}",
                    style("error").red().bold(),
                    file.display(),
                    message
                );
                report.failed.push((file, message));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(report)
}

/// Translates one file to its output path.
fn translate_one(
    input: &Path,
    output: &Path,
    options: &JobOptions,
    cache: &TranslationCache,
) -> anyhow::Result<()> {
    debug!("translating {}", input.display());
    let source =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;

    let mut translator = Translator::new(Options {
        strict: options.strict,
    });

    let emitted = if options.emit_ast {
        let module = translator.translate_chunk(parse(&source)?)?;
        serde_json::to_string_pretty(&module)?
    } else {
        translator.translate_cached(&source, cache)?.source.clone()
    };

    if options.verbose {
        for warning in translator.warnings() {
            eprintln!(
                "{} {}: {}",
                style("warning").yellow().bold(),
                input.display(),
                warning
            );
        }
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(output, emitted).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Collects every `.lua` file under a root, skipping hidden entries.
fn collect_lua_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.lua", root.display());
    let excludes = hidden_excludes()?;
    let mut files = Vec::new();
    for entry in glob::glob(&pattern).context("building file pattern")? {
        let path = entry?;
        if excludes.is_match(&path) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn hidden_excludes() -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("**/.*")?);
    builder.add(Glob::new("**/.*/**")?);
    Ok(builder.build()?)
}

/// Output path next to the input, with the target extension.
fn sibling_output(input: &Path, extension: &str, emit_ast: bool) -> PathBuf {
    let extension = if emit_ast { "ast.json" } else { extension };
    input.with_extension(extension)
}

/// Output path mirroring the input's position under the output root.
fn mirrored_output(
    input: &Path,
    root: &Path,
    output_root: &Path,
    options: &JobOptions,
) -> PathBuf {
    let relative = input.strip_prefix(root).unwrap_or(input);
    let extension = if options.emit_ast {
        "ast.json"
    } else {
        options.extension.as_str()
    };
    output_root.join(relative).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn translates_a_single_file_next_to_the_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("hello.lua");
        fs::write(&input, "print('hi')\n").unwrap();

        let report = run_path(&input, &JobOptions::default()).unwrap();
        assert!(report.success());
        assert_eq!(report.translated, 1);

        let emitted = fs::read_to_string(dir.path().join("hello.py")).unwrap();
        assert_eq!(emitted, "print('hi')\n");
    }

    #[test]
    fn directory_mode_mirrors_the_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(dir.path().join("src/a.lua"), "x = 1\n").unwrap();
        fs::write(dir.path().join("src/sub/b.lua"), "y = 2\n").unwrap();

        let out = dir.path().join("out");
        let options = JobOptions {
            output: Some(out.clone()),
            ..JobOptions::default()
        };
        let report = run_path(&dir.path().join("src"), &options).unwrap();
        assert!(report.success());
        assert_eq!(report.translated, 2);
        assert!(out.join("a.py").exists());
        assert!(out.join("sub/b.py").exists());
    }

    #[test]
    fn failures_are_reported_but_do_not_abort_the_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.lua"), "x = 1\n").unwrap();
        fs::write(dir.path().join("bad.lua"), "local = oops\n").unwrap();

        let report = run_path(dir.path(), &JobOptions::default()).unwrap();
        assert_eq!(report.translated, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("bad.lua"));
        assert!(!report.success());
    }

    #[test]
    fn emit_ast_writes_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("m.lua");
        fs::write(&input, "x = 1\n").unwrap();

        let options = JobOptions {
            emit_ast: true,
            ..JobOptions::default()
        };
        let report = run_path(&input, &options).unwrap();
        assert!(report.success());

        let raw = fs::read_to_string(dir.path().join("m.ast.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("body").is_some());
    }

    #[test]
    fn strict_mode_fails_the_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("m.lua");
        fs::write(&input, "function Ghost:speak() end\n").unwrap();

        let options = JobOptions {
            strict: true,
            ..JobOptions::default()
        };
        let report = run_path(&input, &options).unwrap();
        assert!(!report.success());
    }
}
