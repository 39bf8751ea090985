// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File system watching for retranslation on change.
//!
//! Watch mode runs the full job once, then stays resident and re-runs the
//! translation for each changed file. Events are debounced and filtered
//! to `.lua` files.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, Debouncer, RecommendedCache};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

use crate::job::{run_path, JobOptions, JobReport};

/// Watches a directory tree for changes to Lua files.
///
/// Uses debouncing to prevent multiple rapid retranslations and filters
/// events to only trigger on relevant file types.
pub struct FileWatcher {
    #[allow(dead_code)]
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    rx: mpsc::Receiver<Vec<PathBuf>>,
}

impl FileWatcher {
    /// Creates a new watcher over `path` with the given debounce window.
    ///
    /// Only `.lua` files produce events.
    pub fn new(path: &Path, debounce_ms: u64) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            None,
            move |result: Result<Vec<notify_debouncer_full::DebouncedEvent>, Vec<notify::Error>>| {
                if let Ok(events) = result {
                    let changed: Vec<PathBuf> = events
                        .iter()
                        .flat_map(|e| e.paths.iter())
                        .filter(|p| {
                            matches!(p.extension().and_then(|e| e.to_str()), Some("lua"))
                        })
                        .cloned()
                        .collect();
                    if !changed.is_empty() {
                        let _ = tx.send(changed);
                    }
                }
            },
        )?;

        debouncer.watch(path, RecursiveMode::Recursive)?;
        Ok(Self { debouncer, rx })
    }

    /// Blocks until the next batch of changed paths.
    pub fn next_batch(&self) -> Option<Vec<PathBuf>> {
        self.rx.recv().ok()
    }
}

/// Runs the job once, then retranslates on every change until interrupted.
pub fn watch_loop(path: &Path, options: &JobOptions, debounce_ms: u64) -> anyhow::Result<()> {
    let initial = run_path(path, options)?;
    summarize(&initial);

    let watch_root = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().unwrap_or(Path::new(".")).to_path_buf()
    };
    let watcher = FileWatcher::new(&watch_root, debounce_ms)?;
    info!("watching {} for changes", watch_root.display());

    while let Some(changed) = watcher.next_batch() {
        for file in changed {
            info!("change detected: {}", file.display());
            let report = run_path(&file, options)?;
            summarize(&report);
        }
    }
    Ok(())
}

fn summarize(report: &JobReport) {
    if report.success() {
        info!("translated {} file(s)", report.translated);
    } else {
        info!(
            "translated {} file(s), {} failed",
            report.translated,
            report.failed.len()
        );
    }
}
