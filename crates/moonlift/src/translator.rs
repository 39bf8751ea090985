// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The translation orchestrator.
//!
//! [`Translator`] wires the pipeline together: parse, recognize, lower,
//! rewrite, unparse, resolve imports. It owns the per-invocation options
//! and collects the recoverable warnings each run produces.
//!
//! The free functions [`translate_source`] and [`translate_ast`] cover
//! the common one-shot case with default options.

use tracing::debug;

use crate::cache::{content_key, Translated, TranslationCache};
use crate::error::{Result, TranslateError, Warning};
use crate::imports::map_stdlib;
use crate::lower::lower_chunk;
use crate::lua_ast::Chunk;
use crate::parser::parse;
use crate::py_ast::PyModule;
use crate::recognize::recognize;
use crate::rewrite::rewrite_module;
use crate::unparse::unparse;

/// Options controlling a translation run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Promote recoverable warnings to errors.
    pub strict: bool,
}

/// Translates Lua sources to target source text.
///
/// One `Translator` handles any number of inputs sequentially; warnings
/// are reset at the start of each run and can be inspected afterwards.
#[derive(Debug, Default)]
pub struct Translator {
    options: Options,
    warnings: Vec<Warning>,
}

impl Translator {
    /// Creates a translator with the given options.
    pub fn new(options: Options) -> Self {
        Translator {
            options,
            warnings: Vec::new(),
        }
    }

    /// Warnings collected by the most recent run.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Translates Lua source text to target source text.
    pub fn translate_source(&mut self, source: &str) -> Result<String> {
        let chunk = parse(source)?;
        let module = self.translate_chunk(chunk)?;
        let text = unparse(&module)?;
        Ok(map_stdlib(&text))
    }

    /// Translates a parsed chunk to a target module.
    ///
    /// Recognition runs here, so raw parser output is accepted.
    pub fn translate_chunk(&mut self, mut chunk: Chunk) -> Result<PyModule> {
        recognize(&mut chunk);
        let (mut module, warnings) = lower_chunk(&chunk)?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        if self.options.strict {
            if let Some(warning) = warnings.first() {
                return Err(TranslateError::Strict(warning.clone()));
            }
        }
        self.warnings = warnings;
        rewrite_module(&mut module);
        debug!("translated chunk: {} top-level statements", module.body.len());
        Ok(module)
    }

    /// Translates source text, consulting a shared cache first.
    pub fn translate_cached(
        &mut self,
        source: &str,
        cache: &TranslationCache,
    ) -> Result<std::sync::Arc<Translated>> {
        let key = content_key(source);
        if let Some(hit) = cache.get(&key) {
            debug!("translation cache hit");
            self.warnings = hit.warnings.clone();
            return Ok(hit);
        }
        let text = self.translate_source(source)?;
        Ok(cache.insert(
            key,
            Translated {
                source: text,
                warnings: self.warnings.clone(),
            },
        ))
    }
}

/// Translates Lua source text with default options.
pub fn translate_source(source: &str) -> Result<String> {
    Translator::new(Options::default()).translate_source(source)
}

/// Translates a parsed Lua chunk to a target module with default options.
pub fn translate_ast(chunk: Chunk) -> Result<PyModule> {
    Translator::new(Options::default()).translate_chunk(chunk)
}
