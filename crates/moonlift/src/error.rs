// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the moonlift translator.
//!
//! This module defines [`TranslateError`], the main error enum, and helper
//! types for rich error reporting with source context.
//!
//! # Error Categories
//!
//! - **Parse errors**: Invalid Lua syntax, reported with line/column context
//! - **Lowering errors**: Lua AST shapes the lowering engine cannot handle
//! - **Unparse errors**: Internally inconsistent target expressions
//! - **Strict violations**: Recoverable warnings promoted by strict mode
//!
//! # Warnings
//!
//! Recoverable conditions (a malformed `extend` pattern, a method whose
//! owning class was never declared) are modeled as [`Warning`] values. They
//! are collected by the [`Translator`](crate::Translator) and only become
//! errors when strict mode is enabled.

use std::fmt;
use thiserror::Error;

/// Source context for enhanced error messages.
///
/// Captures a snippet of source code around an error location,
/// enabling rich error messages with line numbers and a caret pointing
/// to the exact error column.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// All lines from the source file.
    pub lines: Vec<String>,
    /// The line number where the error occurred (1-indexed).
    pub error_line: usize,
    /// The column number where the error occurred (1-indexed).
    pub error_column: usize,
    /// First line number of the snippet (1-indexed).
    pub snippet_start: usize,
    /// Last line number of the snippet (1-indexed).
    pub snippet_end: usize,
}

impl SourceContext {
    /// Creates a source context from source code and error location.
    ///
    /// Captures 3 lines before and after the error line for context.
    pub fn from_source(source: &str, line: usize, column: usize) -> Self {
        let lines: Vec<String> = source.lines().map(|l| l.to_string()).collect();
        let snippet_start = line.saturating_sub(3).max(1);
        let snippet_end = (line + 3).min(lines.len());

        Self {
            lines,
            error_line: line,
            error_column: column,
            snippet_start,
            snippet_end,
        }
    }

    /// Formats the source snippet with line numbers and error indicator.
    ///
    /// Returns a string like:
    /// ```text
    ///    4 | local t = {1, 2, 3}
    ///    5 | for kv in ipairs(t do
    ///      |                    ^
    ///    6 | end
    /// ```
    pub fn format_snippet(&self) -> String {
        let mut result = String::new();

        for line_num in self.snippet_start..=self.snippet_end {
            if line_num > self.lines.len() {
                break;
            }

            let line = &self.lines[line_num - 1];
            let is_error_line = line_num == self.error_line;

            result.push_str(&format!("{:4} | {}\n", line_num, line));

            if is_error_line {
                result.push_str(&format!(
                    "     | {}^\n",
                    " ".repeat(self.error_column.saturating_sub(1))
                ));
            }
        }

        result
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_snippet())
    }
}

/// Helper struct for displaying optional source context.
pub struct OptSourceContextDisplay<'a>(pub &'a Option<SourceContext>);

impl<'a> fmt::Display for OptSourceContextDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ctx) => write!(f, "{}", ctx),
            None => write!(f, ""),
        }
    }
}

/// Helper trait for formatting optional source context.
pub trait AsDisplay<'a> {
    /// Wraps self for Display formatting.
    fn as_display(&'a self) -> OptSourceContextDisplay<'a>;
}

impl<'a> AsDisplay<'a> for Option<SourceContext> {
    fn as_display(&'a self) -> OptSourceContextDisplay<'a> {
        OptSourceContextDisplay(self)
    }
}

/// A recoverable condition noticed during lowering.
///
/// Warnings never abort a translation on their own; strict mode promotes
/// the first warning to [`TranslateError::Strict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An `extend`-shaped assignment whose right-hand side does not resolve
    /// to a named base. The class is still emitted with no bases.
    MalformedClassPattern {
        /// The class name on the left-hand side.
        class: String,
    },
    /// A method declared with `:` whose receiver matches no declared class.
    /// The method is emitted as a top-level function instead.
    UnresolvedMethodOwner {
        /// The method name.
        method: String,
        /// The receiver it was declared on, if it was a bare name.
        owner: Option<String>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedClassPattern { class } => {
                write!(f, "class pattern for `{}` has no resolvable base", class)
            }
            Warning::UnresolvedMethodOwner { method, owner } => match owner {
                Some(owner) => write!(
                    f,
                    "method `{}` declared on `{}`, which is not a known class",
                    method, owner
                ),
                None => write!(f, "method `{}` has no resolvable owner", method),
            },
        }
    }
}

/// The main error type for moonlift operations.
///
/// All fallible moonlift functions return `Result<T, TranslateError>` to
/// provide detailed error information for debugging and user feedback.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Lua parsing failed due to invalid syntax.
    #[error("Parse error in {file:?}: {message} at line {line}, column {column}\n{}", source_context.as_display())]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred.
        line: usize,
        /// Column number where the error occurred.
        column: usize,
        /// The file path, if known.
        file: Option<String>,
        /// Source context for rich error display.
        source_context: Option<SourceContext>,
    },

    /// The lowering engine met a node shape it has no handler for.
    ///
    /// The Lua and target taxonomies are sealed enums, so the compiler
    /// proves the per-variant dispatch exhaustive; this variant exists for
    /// API stability and for embedders that extend the pipeline.
    #[error("No lowering handler for node kind `{0}`")]
    UnknownNode(String),

    /// An expression reached the unparser in an internally inconsistent
    /// shape (for example, a comparison with no operators).
    #[error("Unparse error: {0}")]
    UnparseError(String),

    /// A recoverable warning promoted to an error by strict mode.
    #[error("strict mode: {0}")]
    Strict(Warning),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`TranslateError`].
pub type Result<T> = std::result::Result<T, TranslateError>;
