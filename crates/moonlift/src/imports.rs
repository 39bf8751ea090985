// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Stdlib renaming and import resolution over emitted source text.
//!
//! Runs once after unparsing. First the Lua standard-library spellings
//! that survived the AST-level rewrites are renamed to their target
//! equivalents (`math.deg` to `math.degrees`, `os.time` to `time.time`,
//! `collectgarbage` to `gc.collect`, ...). Then the text is scanned for
//! references to standard modules and the minimal set of `import` lines is
//! prepended. The scan is textual and never removes existing imports.

use lazy_static::lazy_static;
use regex::Regex;

/// Dotted-name renames applied before the module scan.
///
/// Order matters only across namespaces: the `os.*` time and process
/// entries must map away before the plain `os` scan would claim them.
const RENAMES: &[(&str, &str)] = &[
    // math library corrections
    ("math.abs", "abs"),
    ("math.deg", "math.degrees"),
    ("math.rad", "math.radians"),
    ("math.huge", "float('inf')"),
    ("math.max", "max"),
    ("math.min", "min"),
    ("math.pow", "pow"),
    // string patterns go through the regex module
    ("string.gmatch", "re.finditer"),
    ("string.gsub", "re.sub"),
    ("string.match", "re.match"),
    ("string.len", "len"),
    ("string.char", "chr"),
    ("string.byte", "ord"),
    // time family before the generic os entries
    ("os.difftime", "time.difftime"),
    ("os.clock", "time.process_time"),
    ("os.date", "time.strftime"),
    ("os.time", "time.time"),
    // process control
    ("os.exit", "sys.exit"),
    ("os.setlocale", "locale.setlocale"),
    ("os.tmpname", "tempfile.mktemp"),
    ("io.tmpfile", "tempfile.TemporaryFile"),
    ("os.execute", "os.system"),
    ("io.popen", "os.popen"),
    // file handles
    ("io.open", "open"),
    ("io.input", "open"),
    ("io.output", "open"),
    ("io.write", "file.write"),
    ("io.read", "file.read"),
    ("io.lines", "file.readlines"),
    ("io.close", "file.close"),
    ("io.flush", "file.flush"),
];

/// Bare-name renames, matched on word boundaries.
const BARE_RENAMES: &[(&str, &str)] = &[
    ("collectgarbage", "gc.collect"),
    ("tostring", "str"),
    ("tonumber", "float"),
];

/// Standard modules whose textual presence demands an import line.
const STANDARD_MODULES: &[&str] = &[
    "math", "os", "time", "re", "sys", "tempfile", "gc", "locale",
];

lazy_static! {
    static ref RENAME_PATTERNS: Vec<(Regex, &'static str)> = RENAMES
        .iter()
        .map(|(from, to)| {
            let pattern = format!(r"\b{}\b", regex::escape(from));
            (Regex::new(&pattern).expect("static rename pattern"), *to)
        })
        .collect();
    static ref BARE_PATTERNS: Vec<(Regex, &'static str)> = BARE_RENAMES
        .iter()
        .map(|(from, to)| {
            let pattern = format!(r"\b{}\b", regex::escape(from));
            (Regex::new(&pattern).expect("static rename pattern"), *to)
        })
        .collect();
    static ref MODULE_PATTERNS: Vec<(&'static str, Regex)> = STANDARD_MODULES
        .iter()
        .map(|module| {
            let pattern = format!(r"\b{}\.", regex::escape(module));
            (*module, Regex::new(&pattern).expect("static module pattern"))
        })
        .collect();
}

/// Applies the rename tables and prepends the required imports.
pub fn map_stdlib(source: &str) -> String {
    let mut text = source.to_string();
    for (pattern, replacement) in RENAME_PATTERNS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    for (pattern, replacement) in BARE_PATTERNS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    resolve_imports(&text)
}

/// Prepends one `import` line per referenced standard module.
///
/// Modules already imported in the text are not imported twice; nothing
/// is ever removed.
pub fn resolve_imports(source: &str) -> String {
    let mut header = String::new();
    for (module, pattern) in MODULE_PATTERNS.iter() {
        if !pattern.is_match(source) {
            continue;
        }
        let existing = format!("import {}", module);
        if source.lines().any(|line| line.trim() == existing) {
            continue;
        }
        header.push_str(&existing);
        header.push('\n');
    }
    if header.is_empty() {
        source.to_string()
    } else {
        format!("{}{}", header, source)
    }
}
