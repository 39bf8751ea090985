// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! WASM Library and Test Runner for moonlift
//!
//! This binary provides:
//! 1. A JavaScript-callable API via extern "C" functions for browser/Node.js usage
//! 2. A smoke test for the WASM build (runs on startup in test mode)
//!
//! Compiled with Emscripten and can be used in browsers or Node.js.
//! The translator is stateless, so unlike richer engines there is no
//! init/teardown pair: each call is a pure string-to-string transform.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use moonlift::{Options, TranslateError, Translator};

// ============================================================================
// Extern "C" API for JavaScript
// ============================================================================

/// Translates Lua source to Python source.
/// Returns a newly allocated C string; free it with `moonlift_free`.
/// On failure returns a JSON error payload `{"error", "line", "column"}`.
///
/// # Safety
///
/// - `source` must be a valid pointer to a null-terminated UTF-8 string, or null.
#[no_mangle]
pub unsafe extern "C" fn moonlift_translate(source: *const c_char) -> *mut c_char {
    translate_impl(source, false)
}

/// Like `moonlift_translate`, but returns a JSON payload
/// `{"source": "...", "warnings": ["..."]}` on success.
///
/// # Safety
///
/// - `source` must be a valid pointer to a null-terminated UTF-8 string, or null.
#[no_mangle]
pub unsafe extern "C" fn moonlift_translate_verbose(source: *const c_char) -> *mut c_char {
    translate_impl(source, true)
}

/// Frees a string returned by the translate functions.
///
/// # Safety
///
/// - `ptr` must have been returned by `moonlift_translate` or
///   `moonlift_translate_verbose` and not freed before.
#[no_mangle]
pub unsafe extern "C" fn moonlift_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

unsafe fn translate_impl(source: *const c_char, verbose: bool) -> *mut c_char {
    if source.is_null() {
        return error_payload("null source pointer", None);
    }
    let source = match CStr::from_ptr(source).to_str() {
        Ok(s) => s,
        Err(_) => return error_payload("source is not valid UTF-8", None),
    };

    let mut translator = Translator::new(Options::default());
    match translator.translate_source(source) {
        Ok(python) => {
            let out = if verbose {
                let warnings: Vec<String> = translator
                    .warnings()
                    .iter()
                    .map(|w| w.to_string())
                    .collect();
                serde_json::json!({ "source": python, "warnings": warnings }).to_string()
            } else {
                python
            };
            into_raw(out)
        }
        Err(TranslateError::ParseError { message, line, column, .. }) => {
            error_payload(&message, Some((line, column)))
        }
        Err(other) => error_payload(&other.to_string(), None),
    }
}

fn error_payload(message: &str, position: Option<(usize, usize)>) -> *mut c_char {
    let payload = match position {
        Some((line, column)) => {
            serde_json::json!({ "error": message, "line": line, "column": column })
        }
        None => serde_json::json!({ "error": message }),
    };
    into_raw(payload.to_string())
}

fn into_raw(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|_| CString::new("{\"error\":\"interior NUL in output\"}").unwrap())
        .into_raw()
}

// ============================================================================
// Smoke test entry point
// ============================================================================

fn main() {
    let sample = "print('hello from wasm')";
    match moonlift::translate_source(sample) {
        Ok(python) => println!("{}", python),
        Err(error) => {
            eprintln!("translation failed: {}", error);
            std::process::exit(1);
        }
    }
}
