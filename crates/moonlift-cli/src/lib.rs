// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! MOONLIFT CLI library.
//!
//! This crate provides the command-line interface for the moonlift
//! translator: argument handling, project configuration, directory
//! walking, per-file job execution, and the watch loop.
//!
//! # Usage
//!
//! This crate is primarily used through the `moonlift` binary:
//!
//! ```bash
//! moonlift game.lua             # translate one file to game.py
//! moonlift src/ -o out/         # translate a tree, mirroring it
//! moonlift src/ --watch         # stay resident, retranslate on change
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `moonlift.toml` at the project root;
//! command-line flags override file configuration.

/// Project configuration from `moonlift.toml`.
pub mod config;
/// Translation job execution (single files and directory trees).
pub mod job;
/// File system watching for retranslation on change.
pub mod watcher;
