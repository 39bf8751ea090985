// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Pre-lowering recognition pass.
//!
//! Rewrites surface shapes the parser emits into the derived Lua AST
//! variants the lowering engine dispatches on:
//!
//! - `Cls = Base:extend()` becomes [`StatKind::Constructor`]
//! - `function Cls:init(...)` becomes [`StatKind::Initializer`]
//! - a `require("path")` call statement (or an assignment whose only value
//!   is one) becomes [`StatKind::Require`]
//! - `for kv in ipairs(seq)` becomes [`StatKind::ForEnumerate`]
//!
//! The pass is purely structural: it never fails and never consults any
//! context beyond the node it is looking at. A `Constructor` whose base
//! does not resolve to a bare name keeps an empty base list; the lowering
//! engine reports that as a recoverable warning.

use crate::lua_ast::*;

/// Runs the recognition pass over a chunk, in place.
pub fn recognize(chunk: &mut Chunk) {
    recognize_block(&mut chunk.body);
}

fn recognize_block(block: &mut Block) {
    for stat in &mut block.body {
        recognize_stat(stat);
    }
}

fn recognize_stat(stat: &mut Stat) {
    if let Some(kind) = derived_kind(&stat.kind) {
        stat.kind = kind;
    }

    match &mut stat.kind {
        StatKind::While { body, .. }
        | StatKind::Repeat { body, .. }
        | StatKind::Do { body }
        | StatKind::Fornum { body, .. }
        | StatKind::Forin { body, .. }
        | StatKind::ForEnumerate { body, .. }
        | StatKind::Function { body, .. }
        | StatKind::LocalFunction { body, .. }
        | StatKind::Method { body, .. }
        | StatKind::Initializer { body, .. } => recognize_block(body),
        StatKind::If { body, orelse, .. } => {
            recognize_block(body);
            let mut next = orelse.as_deref_mut();
            while let Some(clause) = next {
                match clause {
                    OrElse::Else(block) => {
                        recognize_block(block);
                        next = None;
                    }
                    OrElse::ElseIf { body, orelse, .. } => {
                        recognize_block(body);
                        next = orelse.as_deref_mut();
                    }
                }
            }
        }
        _ => {}
    }
}

/// Computes the derived variant for a statement, if one applies.
fn derived_kind(kind: &StatKind) -> Option<StatKind> {
    match kind {
        StatKind::Assign { targets, values } => {
            recognize_constructor(targets, values).or_else(|| recognize_require_values(values))
        }
        StatKind::LocalAssign { values, .. } => recognize_require_values(values),
        StatKind::Method {
            source,
            name,
            args,
            body,
        } if name == "init" => Some(StatKind::Initializer {
            source: source.clone(),
            name: name.clone(),
            args: args.clone(),
            body: body.clone(),
        }),
        StatKind::CallStat { call } => recognize_require_call(call),
        StatKind::Forin {
            targets,
            iter,
            body,
        } => recognize_for_enumerate(targets, iter, body),
        _ => None,
    }
}

/// `Cls = Base:extend()` — the single-inheritance class idiom.
fn recognize_constructor(targets: &[Expr], values: &[Expr]) -> Option<StatKind> {
    let [target] = targets else { return None };
    let [value] = values else { return None };
    let name = target.as_name()?;
    let Expr::Invoke { source, func, .. } = value else {
        return None;
    };
    if func != "extend" {
        return None;
    }
    // a base that is not a bare name stays empty; lowering warns about it
    let bases = match source.as_name() {
        Some(base) => vec![base.to_string()],
        None => Vec::new(),
    };
    Some(StatKind::Constructor {
        name: name.to_string(),
        bases,
    })
}

/// A `require` call with all-string arguments.
fn recognize_require_call(call: &Expr) -> Option<StatKind> {
    let Expr::Call { func, args } = call else {
        return None;
    };
    if func.as_name() != Some("require") || args.is_empty() {
        return None;
    }
    let mut strings = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Expr::Str { value, .. } => strings.push(value.clone()),
            _ => return None,
        }
    }
    Some(StatKind::Require { args: strings })
}

/// `x = require("path")` — the binding is dropped, the import kept.
fn recognize_require_values(values: &[Expr]) -> Option<StatKind> {
    let [value] = values else { return None };
    recognize_require_call(value)
}

/// `for kv in ipairs(seq) do ... end`
fn recognize_for_enumerate(targets: &[Expr], iter: &[Expr], body: &Block) -> Option<StatKind> {
    let [iter_expr] = iter else { return None };
    let Expr::Call { func, args } = iter_expr else {
        return None;
    };
    if func.as_name() != Some("ipairs") {
        return None;
    }
    let [seq] = args.as_slice() else { return None };
    Some(StatKind::ForEnumerate {
        targets: targets.to_vec(),
        seq: seq.clone(),
        body: body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn recognized(source: &str) -> Vec<StatKind> {
        let mut chunk = parse(source).unwrap();
        recognize(&mut chunk);
        chunk.body.body.into_iter().map(|s| s.kind).collect()
    }

    #[test]
    fn extend_assignment_becomes_constructor() {
        let stats = recognized("Animal = Object:extend()");
        assert_eq!(
            stats[0],
            StatKind::Constructor {
                name: "Animal".to_string(),
                bases: vec!["Object".to_string()],
            }
        );
    }

    #[test]
    fn dotted_extend_base_is_kept_malformed() {
        let stats = recognized("Cls = a.b:extend()");
        assert_eq!(
            stats[0],
            StatKind::Constructor {
                name: "Cls".to_string(),
                bases: Vec::new(),
            }
        );
    }

    #[test]
    fn init_method_becomes_initializer() {
        let stats = recognized("function Animal:init(name) self.name = name end");
        assert!(matches!(&stats[0], StatKind::Initializer { name, .. } if name == "init"));
    }

    #[test]
    fn other_methods_stay_methods() {
        let stats = recognized("function Animal:speak() end");
        assert!(matches!(&stats[0], StatKind::Method { .. }));
    }

    #[test]
    fn require_call_and_assignment_become_require() {
        let stats = recognized("require('a/b')\nlocal util = require('lib.util')");
        assert_eq!(
            stats[0],
            StatKind::Require {
                args: vec!["a/b".to_string()]
            }
        );
        assert_eq!(
            stats[1],
            StatKind::Require {
                args: vec!["lib.util".to_string()]
            }
        );
    }

    #[test]
    fn require_with_non_string_argument_is_left_alone() {
        let stats = recognized("require(name)");
        assert!(matches!(&stats[0], StatKind::CallStat { .. }));
    }

    #[test]
    fn ipairs_loop_becomes_for_enumerate() {
        let stats = recognized("for kv in ipairs(list) do print(kv) end");
        match &stats[0] {
            StatKind::ForEnumerate { targets, seq, .. } => {
                assert_eq!(targets.len(), 1);
                assert_eq!(seq.as_name(), Some("list"));
            }
            other => panic!("expected ForEnumerate, got {:?}", other),
        }
    }

    #[test]
    fn pairs_loop_is_not_recognized() {
        let stats = recognized("for kv in pairs(map) do end");
        assert!(matches!(&stats[0], StatKind::Forin { .. }));
    }

    #[test]
    fn recognition_descends_into_nested_blocks() {
        let stats = recognized("if x then Cls = Base:extend() end");
        match &stats[0] {
            StatKind::If { body, .. } => {
                assert!(matches!(&body.body[0].kind, StatKind::Constructor { .. }));
            }
            other => panic!("expected If, got {:?}", other),
        }
    }
}
