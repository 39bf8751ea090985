// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # MOONLIFT
//!
//! Lua to Python source-to-source translator.
//!
//! Moonlift converts Lua programs into Python programs that preserve the
//! observable behavior of the original to the extent the two languages'
//! semantics overlap. The translation is syntactic and idiomatic, not a
//! runtime emulation: the `extend` object idiom becomes a class, `obj:m()`
//! becomes a method call, `ipairs`/`pairs` become enumeration and
//! mapping-items loops, and the Lua standard library is renamed to its
//! Python counterparts with the required imports inserted.
//!
//! ## Pipeline
//!
//! ```text
//! Lua source -> lex -> parse -> recognize -> lower -> rewrite -> unparse -> imports
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use moonlift::translate_source;
//!
//! let python = translate_source("print('hello')").unwrap();
//! assert_eq!(python, "print('hello')\n");
//! ```

/// Lua AST node taxonomy.
pub mod lua_ast;
/// Lua tokenizer.
pub mod lexer;
/// Recursive-descent Lua parser.
pub mod parser;
/// Pre-lowering recognition of derived variants.
pub mod recognize;
/// Target (Python) AST node taxonomy.
pub mod py_ast;
/// Lowering from the Lua AST to the target AST.
pub mod lower;
/// Idiom rewriting over the target AST.
pub mod rewrite;
/// Target-source emission.
pub mod unparse;
/// Stdlib renaming and import resolution.
pub mod imports;
/// Content-addressed caching of translated modules.
pub mod cache;
/// The translation orchestrator.
pub mod translator;
/// Error types and reporting.
pub mod error;

pub use cache::{content_key, Translated, TranslationCache};
pub use error::{Result, SourceContext, TranslateError, Warning};
pub use lua_ast::Chunk;
pub use parser::parse;
pub use py_ast::PyModule;
pub use translator::{translate_ast, translate_source, Options, Translator};
pub use unparse::unparse;

#[cfg(test)]
mod tests;
