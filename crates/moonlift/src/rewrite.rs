// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Idiom rewriting over the target AST.
//!
//! A post-order walk applying narrow, shape-specific substitutions after
//! lowering: Lua stdlib calls become receiver methods, `HEX` becomes the
//! builtin `hex`, and the two iteration idioms (`ipairs`, `pairs`) become
//! enumeration and mapping-items loops.
//!
//! Every rule is a predicate plus a replacement. The pass is idempotent
//! and its rules are order-independent; no rule's output matches another
//! rule's predicate.
//!
//! | pattern | rewrite |
//! |---|---|
//! | `table.insert(t, x)` | `t.append(x)` |
//! | `table.remove(t, i)` | `t.pop(i)` |
//! | `table.sort(t)` | `t.sort()` |
//! | `table.concat(t)` | `''.join(t)` |
//! | `string.upper(s)` | `s.upper()` |
//! | `string.lower(s)` | `s.lower()` |
//! | `string.find(s, p)` | `s.find(p)` |
//! | `string.sub(s, a, b)` | `s.replace(a, b)` |
//! | `string.rep(s, n)` | `s.replace(n)` |
//! | `string.format(s, ...)` | `s.format(...)` |
//! | `HEX(x)` | `hex(x)` |
//! | `for ab in ipairs(t)` | `for a, b in enumerate(t)` |
//! | `for ... in pairs(t)` | `for ... in t.items()` |

use crate::lower::split_loop_var;
use crate::py_ast::*;

/// Applies every rewrite rule across a module, in place.
pub fn rewrite_module(module: &mut PyModule) {
    rewrite_stmts(&mut module.body);
}

fn rewrite_stmts(stmts: &mut [PyStmt]) {
    for stmt in stmts {
        rewrite_stmt(stmt);
    }
}

fn rewrite_stmt(stmt: &mut PyStmt) {
    match stmt {
        PyStmt::FunctionDef { args, body, .. } => {
            for default in &mut args.defaults {
                rewrite_expr(default);
            }
            rewrite_stmts(body);
        }
        PyStmt::ClassDef { body, .. } => rewrite_stmts(body),
        PyStmt::Assign { targets, values } => {
            for target in targets {
                rewrite_expr(target);
            }
            for value in values {
                rewrite_expr(value);
            }
        }
        PyStmt::AugAssign { target, value, .. } => {
            rewrite_expr(target);
            rewrite_expr(value);
        }
        PyStmt::Return { values } => {
            for value in values {
                rewrite_expr(value);
            }
        }
        PyStmt::If { test, body, orelse } | PyStmt::While { test, body, orelse } => {
            rewrite_expr(test);
            rewrite_stmts(body);
            rewrite_stmts(orelse);
        }
        PyStmt::For {
            targets,
            iter,
            body,
            orelse,
        } => {
            for target in targets.iter_mut() {
                rewrite_expr(target);
            }
            rewrite_expr(iter);
            rewrite_stmts(body);
            rewrite_stmts(orelse);
            rewrite_for_iteration(targets, iter);
        }
        PyStmt::Expr { value } => rewrite_expr(value),
        PyStmt::Break
        | PyStmt::Continue
        | PyStmt::Pass
        | PyStmt::Import { .. }
        | PyStmt::ImportFrom { .. }
        | PyStmt::Global { .. } => {}
    }
}

fn rewrite_expr(expr: &mut PyExpr) {
    // children first; substitutions apply on the way out
    match expr {
        PyExpr::Call {
            func,
            args,
            keywords,
        } => {
            rewrite_expr(func);
            for arg in args.iter_mut() {
                rewrite_expr(arg);
            }
            for kw in keywords {
                rewrite_expr(&mut kw.value);
            }
        }
        PyExpr::Attribute { value, .. } => rewrite_expr(value),
        PyExpr::Subscript { value, slice } => {
            rewrite_expr(value);
            rewrite_expr(slice);
        }
        PyExpr::BinOp { left, right, .. } => {
            rewrite_expr(left);
            rewrite_expr(right);
        }
        PyExpr::BoolOp { values, .. } => {
            for value in values {
                rewrite_expr(value);
            }
        }
        PyExpr::UnaryOp { operand, .. } => rewrite_expr(operand),
        PyExpr::Compare {
            left, comparators, ..
        } => {
            rewrite_expr(left);
            for comparator in comparators {
                rewrite_expr(comparator);
            }
        }
        PyExpr::IfExp { test, body, orelse } => {
            rewrite_expr(test);
            rewrite_expr(body);
            rewrite_expr(orelse);
        }
        PyExpr::List { elts } | PyExpr::Tuple { elts } => {
            for elt in elts {
                rewrite_expr(elt);
            }
        }
        PyExpr::Dict { keys, values } => {
            for key in keys {
                rewrite_expr(key);
            }
            for value in values {
                rewrite_expr(value);
            }
        }
        PyExpr::Lambda { body, .. } => rewrite_expr(body),
        PyExpr::Starred { value } | PyExpr::FormattedValue { value } => rewrite_expr(value),
        PyExpr::JoinedStr { values } => {
            for value in values {
                rewrite_expr(value);
            }
        }
        PyExpr::Name { .. } | PyExpr::Constant { .. } => {}
    }

    rewrite_call(expr);
}

/// The call-shaped rules: stdlib namespaces and `HEX`.
fn rewrite_call(expr: &mut PyExpr) {
    let PyExpr::Call { func, args, .. } = expr else {
        return;
    };

    // HEX(x) -> hex(x)
    if let PyExpr::Name { id } = func.as_mut() {
        if id == "HEX" {
            *id = "hex".to_string();
        }
        return;
    }

    let PyExpr::Attribute { value, attr } = func.as_mut() else {
        return;
    };
    let Some(namespace) = value.as_name() else {
        return;
    };

    let replacement = match (namespace, attr.as_str()) {
        ("table", "insert") => Rule::Method("append"),
        ("table", "remove") => Rule::Method("pop"),
        ("table", "sort") => Rule::Method("sort"),
        ("table", "concat") => Rule::JoinOnEmptyString,
        ("string", "upper") => Rule::Method("upper"),
        ("string", "lower") => Rule::Method("lower"),
        ("string", "find") => Rule::Method("find"),
        ("string", "sub") => Rule::Method("replace"),
        ("string", "rep") => Rule::Method("replace"),
        ("string", "format") => Rule::Method("format"),
        _ => return,
    };
    if args.is_empty() {
        return;
    }

    let receiver = args.remove(0);
    match replacement {
        Rule::Method(method) => {
            *value = Box::new(receiver);
            *attr = method.to_string();
        }
        Rule::JoinOnEmptyString => {
            *value = Box::new(PyExpr::str(""));
            *attr = "join".to_string();
            args.insert(0, receiver);
        }
    }
}

enum Rule {
    /// `ns.m(recv, ...)` becomes `recv.m'(...)`.
    Method(&'static str),
    /// `table.concat(t, ...)` becomes `''.join(t, ...)`.
    JoinOnEmptyString,
}

/// The loop-shaped rules: `ipairs` and `pairs` iteration.
fn rewrite_for_iteration(targets: &mut Vec<PyExpr>, iter: &mut PyExpr) {
    let PyExpr::Call { func, args, .. } = iter else {
        return;
    };
    let Some(callee) = func.as_name() else {
        return;
    };

    match callee {
        "ipairs" if args.len() == 1 => {
            split_single_target(targets);
            let seq = args.remove(0);
            *iter = PyExpr::call(PyExpr::name("enumerate"), vec![seq]);
        }
        "pairs" if args.len() == 1 => {
            split_single_target(targets);
            let mapping = args.remove(0);
            *iter = PyExpr::call(PyExpr::attr(mapping, "items"), Vec::new());
        }
        _ => {}
    }
}

/// A single-name loop target splits into index and value bindings.
fn split_single_target(targets: &mut Vec<PyExpr>) {
    if let [PyExpr::Name { id }] = targets.as_slice() {
        if let Some((index, value)) = split_loop_var(id) {
            *targets = vec![PyExpr::name(index), PyExpr::name(value)];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unparse::{unparse, unparse_expr};

    fn rewritten(mut expr: PyExpr) -> String {
        rewrite_expr(&mut expr);
        unparse_expr(&expr).unwrap()
    }

    fn ns_call(ns: &str, method: &str, args: Vec<PyExpr>) -> PyExpr {
        PyExpr::call(PyExpr::attr(PyExpr::name(ns), method), args)
    }

    #[test]
    fn table_insert_becomes_append() {
        let e = ns_call("table", "insert", vec![PyExpr::name("t"), PyExpr::num("1")]);
        assert_eq!(rewritten(e), "t.append(1)");
    }

    #[test]
    fn table_remove_becomes_pop() {
        let e = ns_call("table", "remove", vec![PyExpr::name("t")]);
        assert_eq!(rewritten(e), "t.pop()");
    }

    #[test]
    fn table_sort_keeps_its_name() {
        let e = ns_call("table", "sort", vec![PyExpr::name("t")]);
        assert_eq!(rewritten(e), "t.sort()");
    }

    #[test]
    fn table_concat_joins_on_empty_string() {
        let e = ns_call("table", "concat", vec![PyExpr::name("t")]);
        assert_eq!(rewritten(e), "''.join(t)");
    }

    #[test]
    fn string_upper_and_lower() {
        let up = ns_call("string", "upper", vec![PyExpr::name("s")]);
        assert_eq!(rewritten(up), "s.upper()");
        let low = ns_call("string", "lower", vec![PyExpr::name("s")]);
        assert_eq!(rewritten(low), "s.lower()");
    }

    #[test]
    fn string_sub_maps_to_replace() {
        let e = ns_call(
            "string",
            "sub",
            vec![PyExpr::name("s"), PyExpr::name("a"), PyExpr::name("b")],
        );
        assert_eq!(rewritten(e), "s.replace(a, b)");
    }

    #[test]
    fn hex_builtin_is_lowercased() {
        let e = PyExpr::call(PyExpr::name("HEX"), vec![PyExpr::num("255")]);
        assert_eq!(rewritten(e), "hex(255)");
    }

    #[test]
    fn unrelated_namespaces_are_untouched() {
        let e = ns_call("math", "floor", vec![PyExpr::name("x")]);
        assert_eq!(rewritten(e), "math.floor(x)");
    }

    #[test]
    fn rules_are_idempotent() {
        let mut e = ns_call("table", "insert", vec![PyExpr::name("t"), PyExpr::num("1")]);
        rewrite_expr(&mut e);
        let once = unparse_expr(&e).unwrap();
        rewrite_expr(&mut e);
        let twice = unparse_expr(&e).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn ipairs_loop_splits_target_and_enumerates() {
        let mut module = PyModule {
            body: vec![PyStmt::For {
                targets: vec![PyExpr::name("kv")],
                iter: PyExpr::call(PyExpr::name("ipairs"), vec![PyExpr::name("list")]),
                body: vec![PyStmt::Pass],
                orelse: vec![],
            }],
        };
        rewrite_module(&mut module);
        let text = unparse(&module).unwrap();
        assert!(
            text.contains("for k, v in enumerate(list):"),
            "got:\n{}",
            text
        );
    }

    #[test]
    fn single_target_pairs_loop_splits_too() {
        let mut module = PyModule {
            body: vec![PyStmt::For {
                targets: vec![PyExpr::name("kv")],
                iter: PyExpr::call(PyExpr::name("pairs"), vec![PyExpr::name("map")]),
                body: vec![PyStmt::Pass],
                orelse: vec![],
            }],
        };
        rewrite_module(&mut module);
        let text = unparse(&module).unwrap();
        assert!(text.contains("for k, v in map.items():"), "got:\n{}", text);
    }

    #[test]
    fn pairs_loop_iterates_items() {
        let mut module = PyModule {
            body: vec![PyStmt::For {
                targets: vec![PyExpr::name("k"), PyExpr::name("v")],
                iter: PyExpr::call(PyExpr::name("pairs"), vec![PyExpr::name("map")]),
                body: vec![PyStmt::Pass],
                orelse: vec![],
            }],
        };
        rewrite_module(&mut module);
        let text = unparse(&module).unwrap();
        assert!(text.contains("for k, v in map.items():"), "got:\n{}", text);
    }

    #[test]
    fn rewrites_reach_nested_bodies() {
        let mut module = PyModule {
            body: vec![PyStmt::FunctionDef {
                name: "f".to_string(),
                args: Arguments::default(),
                body: vec![PyStmt::Expr {
                    value: ns_call("string", "upper", vec![PyExpr::name("s")]),
                }],
                decorators: vec![],
            }],
        };
        rewrite_module(&mut module);
        let text = unparse(&module).unwrap();
        assert!(text.contains("s.upper()"), "got:\n{}", text);
    }
}
