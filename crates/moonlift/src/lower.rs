// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Lowering from the Lua AST to the target AST.
//!
//! This is the middle of the pipeline: a per-variant translation of every
//! Lua construct onto an equivalent target shape, plus the three pieces of
//! bookkeeping that cannot be done node-locally:
//!
//! - **Class synthesis**: a recognized `Constructor` opens a `ClassDef`;
//!   methods and initializers are *deferred*, then reattached to their
//!   class after the top-level pass, then have their superclass-initializer
//!   calls rewritten (the `Deferred → Reattached → SuperRewritten`
//!   progression). A method whose owner never materializes falls back to a
//!   top-level function and a warning.
//! - **Anonymous-function hoisting**: every `function(...) ... end` in
//!   expression position becomes a named `lambda{N}` definition at the
//!   head of the nearest enclosing function/class scope; the occurrence is
//!   replaced by a reference. Identical definitions (same argument names,
//!   same unparsed body) are shared within a scope.
//! - **Labels and goto**: a label's trailing statements are mirrored into
//!   a function appended at the end of the module, headed by a `global`
//!   naming every identifier the body references; `goto` becomes a call.
//!   Stack depth is not bounded; this is the documented approximation.
//!
//! All state lives in the per-invocation [`Lowering`] value; nothing is
//! global, so translations of different files never interfere.

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, Warning};
use crate::lua_ast::{self as lua, OrElse, StatKind};
use crate::py_ast::*;
use crate::unparse::unparse_stmts;

/// Lowers a recognized chunk into a target module.
///
/// Returns the module together with the recoverable warnings collected
/// along the way.
pub fn lower_chunk(chunk: &lua::Chunk) -> Result<(PyModule, Vec<Warning>)> {
    let mut lowering = Lowering::new();
    let module = lowering.run(chunk)?;
    Ok((module, lowering.warnings))
}

/// Reattachment progress of a deferred method, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodState {
    /// Found, owning class not yet consulted.
    Deferred,
    /// Appended to the owning class body.
    Reattached,
    /// Super-initializer calls inside the body rewritten.
    SuperRewritten,
}

struct PendingMethod {
    owner: Option<String>,
    func: PyStmt,
    state: MethodState,
}

struct LabelFn {
    name: String,
    body: Vec<PyStmt>,
}

/// One hoisting scope (module, function or class body).
#[derive(Default)]
struct Scope {
    hoisted: Vec<PyStmt>,
    seen: HashMap<String, String>,
}

/// Per-invocation lowering state.
struct Lowering {
    warnings: Vec<Warning>,
    lambda_counter: usize,
    scopes: Vec<Scope>,
    pending: Vec<PendingMethod>,
    labels: Vec<LabelFn>,
    current_label: Option<usize>,
    class_bases: HashMap<String, Vec<String>>,
}

impl Lowering {
    fn new() -> Self {
        Lowering {
            warnings: Vec::new(),
            lambda_counter: 0,
            scopes: Vec::new(),
            pending: Vec::new(),
            labels: Vec::new(),
            current_label: None,
            class_bases: HashMap::new(),
        }
    }

    fn run(&mut self, chunk: &lua::Chunk) -> Result<PyModule> {
        self.scopes.push(Scope::default());
        let mut body = self.lower_block(&chunk.body)?;
        let module_scope = self.scopes.pop().expect("module scope");
        prepend(&mut body, module_scope.hoisted);

        self.reattach_methods(&mut body);
        self.append_labels(&mut body);

        Ok(PyModule { body })
    }

    /// Phase 2 of class synthesis: drain the deferred methods.
    fn reattach_methods(&mut self, body: &mut Vec<PyStmt>) {
        let pending = std::mem::take(&mut self.pending);
        for mut method in pending {
            debug_assert_eq!(method.state, MethodState::Deferred);
            let resolved = method
                .owner
                .as_ref()
                .filter(|owner| self.class_bases.contains_key(*owner))
                .cloned();
            let Some(owner) = resolved else {
                let name = match &method.func {
                    PyStmt::FunctionDef { name, .. } => name.clone(),
                    _ => String::new(),
                };
                self.warnings.push(Warning::UnresolvedMethodOwner {
                    method: name,
                    owner: method.owner.clone(),
                });
                body.push(method.func);
                continue;
            };

            method.state = MethodState::Reattached;
            let bases = self.class_bases.get(&owner).cloned().unwrap_or_default();
            if let PyStmt::FunctionDef { body: fbody, name, .. } = &mut method.func {
                rewrite_super_calls(fbody, &owner, &bases);
                debug!("reattached method {}.{}", owner, name);
            }
            method.state = MethodState::SuperRewritten;
            debug_assert_eq!(method.state, MethodState::SuperRewritten);

            match find_class_index(body, &owner) {
                Some(idx) => {
                    if let PyStmt::ClassDef { body: class_body, .. } = &mut body[idx] {
                        class_body.push(method.func);
                    }
                }
                // the class map said it exists; a missing def is a bug in
                // this pass, recover as a top-level function
                None => body.push(method.func),
            }
        }
    }

    /// Appends the label functions, each headed by a `global` statement.
    fn append_labels(&mut self, body: &mut Vec<PyStmt>) {
        for label in std::mem::take(&mut self.labels) {
            let mut names = Vec::new();
            let mut seen = HashSet::new();
            let mut label_body = label.body;
            walk_stmts(&mut label_body, &mut |expr| {
                if let PyExpr::Name { id } = expr {
                    if seen.insert(id.clone()) {
                        names.push(id.clone());
                    }
                }
            });
            let mut fn_body = Vec::with_capacity(label_body.len() + 1);
            if !names.is_empty() {
                fn_body.push(PyStmt::Global { names });
            }
            fn_body.extend(label_body);
            body.push(PyStmt::FunctionDef {
                name: label.name,
                args: Arguments::default(),
                body: fn_body,
                decorators: Vec::new(),
            });
        }
    }

    fn scope(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("at least the module scope")
    }

    fn lower_block(&mut self, block: &lua::Block) -> Result<Vec<PyStmt>> {
        let saved_label = self.current_label.take();
        let mut out = Vec::new();
        for stat in &block.body {
            let start = out.len();
            self.lower_stat(stat, &mut out)?;
            if let Some(idx) = self.current_label {
                let mirrored: Vec<PyStmt> = out[start..].to_vec();
                self.labels[idx].body.extend(mirrored);
            }
        }
        self.current_label = saved_label;
        Ok(out)
    }

    fn lower_stat(&mut self, stat: &lua::Stat, out: &mut Vec<PyStmt>) -> Result<()> {
        match &stat.kind {
            StatKind::Assign { targets, values } | StatKind::LocalAssign { targets, values } => {
                let targets = self.lower_exprs(targets)?;
                let values = if values.is_empty() {
                    vec![PyExpr::Constant {
                        value: PyConst::None,
                    }]
                } else {
                    self.lower_exprs(values)?
                };
                out.push(PyStmt::Assign { targets, values });
            }
            StatKind::While { test, body } => {
                let test = self.lower_expr(test)?;
                let body = self.lower_block(body)?;
                out.push(PyStmt::While {
                    test,
                    body,
                    orelse: Vec::new(),
                });
            }
            StatKind::Repeat { body, test } => {
                let mut py_body = self.lower_block(body)?;
                let test = self.lower_expr(test)?;
                py_body.push(PyStmt::If {
                    test,
                    body: vec![PyStmt::Break],
                    orelse: Vec::new(),
                });
                out.push(PyStmt::While {
                    test: PyExpr::Constant {
                        value: PyConst::True,
                    },
                    body: py_body,
                    orelse: Vec::new(),
                });
            }
            StatKind::Do { body } => {
                out.extend(self.lower_block(body)?);
            }
            StatKind::If { test, body, orelse } => {
                let stmt = self.lower_if(test, body, orelse.as_deref())?;
                out.push(stmt);
            }
            StatKind::Fornum {
                target,
                start,
                stop,
                step,
                body,
            } => {
                let mut range_args = vec![self.lower_expr(start)?, self.lower_expr(stop)?];
                if let Some(step) = step {
                    range_args.push(self.lower_expr(step)?);
                }
                let body = self.lower_block(body)?;
                out.push(PyStmt::For {
                    targets: vec![PyExpr::name(target.clone())],
                    iter: PyExpr::call(PyExpr::name("range"), range_args),
                    body,
                    orelse: Vec::new(),
                });
            }
            StatKind::Forin {
                targets,
                iter,
                body,
            } => {
                let targets = self.lower_exprs(targets)?;
                let iter = match iter.as_slice() {
                    [single] => self.lower_expr(single)?,
                    many => PyExpr::Tuple {
                        elts: self.lower_exprs(many)?,
                    },
                };
                let body = self.lower_block(body)?;
                out.push(PyStmt::For {
                    targets,
                    iter,
                    body,
                    orelse: Vec::new(),
                });
            }
            StatKind::ForEnumerate { targets, seq, body } => {
                let targets = match targets.as_slice() {
                    [lua::Expr::Name { id }] => match split_loop_var(id) {
                        Some((index, value)) => {
                            vec![PyExpr::name(index), PyExpr::name(value)]
                        }
                        None => vec![PyExpr::name(id.clone())],
                    },
                    many => self.lower_exprs(many)?,
                };
                let seq = self.lower_expr(seq)?;
                let body = self.lower_block(body)?;
                out.push(PyStmt::For {
                    targets,
                    iter: PyExpr::call(PyExpr::name("enumerate"), vec![seq]),
                    body,
                    orelse: Vec::new(),
                });
            }
            StatKind::Label { id } => {
                let idx = match self.labels.iter().position(|l| l.name == *id) {
                    Some(idx) => idx,
                    None => {
                        self.labels.push(LabelFn {
                            name: id.clone(),
                            body: Vec::new(),
                        });
                        self.labels.len() - 1
                    }
                };
                self.current_label = Some(idx);
            }
            StatKind::Goto { label } => {
                out.push(PyStmt::Expr {
                    value: PyExpr::call(PyExpr::name(label.clone()), Vec::new()),
                });
            }
            StatKind::Break => out.push(PyStmt::Break),
            StatKind::SemiColon => {}
            StatKind::Return { values } => {
                let values = self.lower_exprs(values)?;
                out.push(PyStmt::Return { values });
            }
            StatKind::Function { name, args, body } => {
                let (py_args, py_body) = self.lower_function_parts(args, body, false)?;
                match name {
                    lua::Expr::Name { id } => {
                        out.push(PyStmt::FunctionDef {
                            name: id.clone(),
                            args: py_args,
                            body: py_body,
                            decorators: Vec::new(),
                        });
                    }
                    dotted => {
                        // `function a.b.c()` keeps the attribute assignment
                        let target = self.lower_expr(dotted)?;
                        let last = last_attr_segment(&target).unwrap_or("func").to_string();
                        out.push(PyStmt::FunctionDef {
                            name: last.clone(),
                            args: py_args,
                            body: py_body,
                            decorators: Vec::new(),
                        });
                        out.push(PyStmt::Assign {
                            targets: vec![target],
                            values: vec![PyExpr::name(last)],
                        });
                    }
                }
            }
            StatKind::LocalFunction { name, args, body } => {
                let (py_args, py_body) = self.lower_function_parts(args, body, false)?;
                out.push(PyStmt::FunctionDef {
                    name: name.clone(),
                    args: py_args,
                    body: py_body,
                    decorators: Vec::new(),
                });
            }
            StatKind::Method {
                source,
                name,
                args,
                body,
            } => {
                self.defer_method(source, name, args, body, false)?;
            }
            StatKind::Initializer {
                source, args, body, ..
            } => {
                self.defer_method(source, "init", args, body, true)?;
            }
            StatKind::CallStat { call } => {
                let value = self.lower_expr(call)?;
                out.push(PyStmt::Expr { value });
            }
            StatKind::Constructor { name, bases } => {
                if bases.is_empty() {
                    self.warnings.push(Warning::MalformedClassPattern {
                        class: name.clone(),
                    });
                }
                // `Object` is the root of the idiom and is never listed
                let py_bases: Vec<PyExpr> = bases
                    .iter()
                    .filter(|base| base.as_str() != "Object")
                    .map(|base| PyExpr::name(base.clone()))
                    .collect();
                let recorded: Vec<String> = bases
                    .iter()
                    .filter(|base| base.as_str() != "Object")
                    .cloned()
                    .collect();
                debug!("registered class {} (bases: {:?})", name, recorded);
                self.class_bases.insert(name.clone(), recorded);
                out.push(PyStmt::ClassDef {
                    name: name.clone(),
                    bases: py_bases,
                    body: Vec::new(),
                    decorators: Vec::new(),
                });
            }
            StatKind::Require { args } => {
                let Some(path) = args.first() else {
                    return Ok(());
                };
                out.push(lower_require(path));
            }
        }
        Ok(())
    }

    fn lower_if(
        &mut self,
        test: &lua::Expr,
        body: &lua::Block,
        orelse: Option<&OrElse>,
    ) -> Result<PyStmt> {
        let test = self.lower_expr(test)?;
        let body = self.lower_block(body)?;
        let orelse = match orelse {
            None => Vec::new(),
            Some(OrElse::Else(block)) => self.lower_block(block)?,
            Some(OrElse::ElseIf {
                test,
                body,
                orelse,
            }) => vec![self.lower_if(test, body, orelse.as_deref())?],
        };
        Ok(PyStmt::If { test, body, orelse })
    }

    /// Lowers a method body and records it for reattachment.
    fn defer_method(
        &mut self,
        source: &lua::Expr,
        name: &str,
        args: &[lua::Param],
        body: &lua::Block,
        is_init: bool,
    ) -> Result<()> {
        let (py_args, py_body) = self.lower_function_parts(args, body, true)?;
        let py_name = if is_init { "__init__" } else { name };
        let owner = source.as_name().map(str::to_string);
        debug!("deferring method {:?}.{}", owner, py_name);
        self.pending.push(PendingMethod {
            owner,
            func: PyStmt::FunctionDef {
                name: py_name.to_string(),
                args: py_args,
                body: py_body,
                decorators: Vec::new(),
            },
            state: MethodState::Deferred,
        });
        Ok(())
    }

    /// Lowers a parameter list and body inside a fresh hoisting scope.
    fn lower_function_parts(
        &mut self,
        args: &[lua::Param],
        body: &lua::Block,
        implicit_self: bool,
    ) -> Result<(Arguments, Vec<PyStmt>)> {
        let mut py_args = Arguments::default();
        if implicit_self {
            py_args.args.push("self".to_string());
        }
        for param in args {
            match param {
                lua::Param::Name(name) => py_args.args.push(name.clone()),
                lua::Param::Varargs => py_args.vararg = Some("args".to_string()),
            }
        }

        self.scopes.push(Scope::default());
        let mut py_body = self.lower_block(body)?;
        let scope = self.scopes.pop().expect("function scope");
        prepend(&mut py_body, scope.hoisted);
        Ok((py_args, py_body))
    }

    fn lower_exprs(&mut self, exprs: &[lua::Expr]) -> Result<Vec<PyExpr>> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }

    fn lower_expr(&mut self, expr: &lua::Expr) -> Result<PyExpr> {
        let lowered = match expr {
            lua::Expr::Nil => PyExpr::Constant {
                value: PyConst::None,
            },
            lua::Expr::True => PyExpr::Constant {
                value: PyConst::True,
            },
            lua::Expr::False => PyExpr::Constant {
                value: PyConst::False,
            },
            lua::Expr::Number { text } => PyExpr::num(text.clone()),
            lua::Expr::Str { value, .. } => PyExpr::str(value.clone()),
            lua::Expr::Varargs => PyExpr::Starred {
                value: Box::new(PyExpr::name("args")),
            },
            lua::Expr::Name { id } => PyExpr::name(id.clone()),
            lua::Expr::Index {
                value,
                idx,
                notation,
            } => {
                let py_value = self.lower_expr(value)?;
                match notation {
                    lua::IndexNotation::Dot => match idx.as_name() {
                        Some(attr) => PyExpr::attr(py_value, attr),
                        None => PyExpr::Subscript {
                            value: Box::new(py_value),
                            slice: Box::new(self.lower_expr(idx)?),
                        },
                    },
                    lua::IndexNotation::Square => PyExpr::Subscript {
                        value: Box::new(py_value),
                        slice: Box::new(self.lower_expr(idx)?),
                    },
                }
            }
            lua::Expr::Table { fields } => self.lower_table(fields)?,
            lua::Expr::AnonymousFunction { args, body } => self.hoist_anonymous(args, body)?,
            lua::Expr::Call { func, args } => {
                let func = self.lower_expr(func)?;
                let args = self.lower_exprs(args)?;
                PyExpr::call(func, args)
            }
            lua::Expr::Invoke { source, func, args } => {
                let source = self.lower_expr(source)?;
                let args = self.lower_exprs(args)?;
                PyExpr::call(PyExpr::attr(source, func.clone()), args)
            }
            lua::Expr::BinOp { op, left, right } => {
                let l = self.lower_expr(left)?;
                let r = self.lower_expr(right)?;
                lower_binop(*op, l, r)
            }
            lua::Expr::UnOp { op, operand } => {
                let operand = self.lower_expr(operand)?;
                match op {
                    lua::UnaryOp::Minus => PyExpr::UnaryOp {
                        op: PyUnaryOp::USub,
                        operand: Box::new(operand),
                    },
                    lua::UnaryOp::Not => PyExpr::UnaryOp {
                        op: PyUnaryOp::Not,
                        operand: Box::new(operand),
                    },
                    lua::UnaryOp::BitNot => PyExpr::UnaryOp {
                        op: PyUnaryOp::Invert,
                        operand: Box::new(operand),
                    },
                    lua::UnaryOp::Length => PyExpr::call(PyExpr::name("len"), vec![operand]),
                }
            }
        };
        Ok(lowered)
    }

    fn lower_table(&mut self, fields: &[lua::Field]) -> Result<PyExpr> {
        if lua::Expr::is_list_table(fields) {
            let elts = fields
                .iter()
                .map(|f| self.lower_expr(&f.value))
                .collect::<Result<Vec<_>>>()?;
            return Ok(PyExpr::List { elts });
        }

        let mut keys = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            let key = match &field.key {
                None => PyExpr::num((position + 1).to_string()),
                Some(key) => match key.as_name() {
                    // a bare-name key is really a string key
                    Some(name) if !field.between_brackets => PyExpr::str(name),
                    _ => self.lower_expr(key)?,
                },
            };
            keys.push(key);
            values.push(self.lower_expr(&field.value)?);
        }
        Ok(PyExpr::Dict { keys, values })
    }

    /// Hoists an anonymous function into the enclosing scope and returns
    /// the replacement reference.
    fn hoist_anonymous(&mut self, args: &[lua::Param], body: &lua::Block) -> Result<PyExpr> {
        let (py_args, py_body) = self.lower_function_parts(args, body, false)?;

        let mut hasher = Sha256::new();
        hasher.update(py_args.args.join(",").as_bytes());
        hasher.update([0]);
        hasher.update(unparse_stmts(&py_body)?.as_bytes());
        let signature = format!("{:x}", hasher.finalize());

        if let Some(existing) = self.scope().seen.get(&signature) {
            debug!("reusing hoisted function {}", existing);
            return Ok(PyExpr::name(existing.clone()));
        }

        self.lambda_counter += 1;
        let name = format!("lambda{}", self.lambda_counter);
        debug!("hoisting anonymous function as {}", name);
        let def = PyStmt::FunctionDef {
            name: name.clone(),
            args: py_args,
            body: py_body,
            decorators: Vec::new(),
        };
        let scope = self.scope();
        scope.hoisted.push(def);
        scope.seen.insert(signature, name.clone());
        Ok(PyExpr::name(name))
    }
}

fn lower_binop(op: lua::BinaryOp, left: PyExpr, right: PyExpr) -> PyExpr {
    use crate::lua_ast::BinaryOp::*;
    let simple = |op: PyBinOp, l: PyExpr, r: PyExpr| PyExpr::BinOp {
        left: Box::new(l),
        op,
        right: Box::new(r),
    };
    let compare = |op: PyCmpOp, l: PyExpr, r: PyExpr| PyExpr::Compare {
        left: Box::new(l),
        ops: vec![op],
        comparators: vec![r],
    };
    match op {
        Add => simple(PyBinOp::Add, left, right),
        Sub => simple(PyBinOp::Sub, left, right),
        Mul => simple(PyBinOp::Mult, left, right),
        FloatDiv => simple(PyBinOp::Div, left, right),
        FloorDiv => simple(PyBinOp::FloorDiv, left, right),
        Mod => simple(PyBinOp::Mod, left, right),
        Pow => simple(PyBinOp::Pow, left, right),
        // the target has no concatenation operator; addition on strings
        Concat => simple(PyBinOp::Add, left, right),
        BitAnd => simple(PyBinOp::BitAnd, left, right),
        BitOr => simple(PyBinOp::BitOr, left, right),
        BitXor => simple(PyBinOp::BitXor, left, right),
        ShiftLeft => simple(PyBinOp::LShift, left, right),
        ShiftRight => simple(PyBinOp::RShift, left, right),
        Lt => compare(PyCmpOp::Lt, left, right),
        Gt => compare(PyCmpOp::Gt, left, right),
        LtEq => compare(PyCmpOp::LtE, left, right),
        GtEq => compare(PyCmpOp::GtE, left, right),
        Eq => compare(PyCmpOp::Eq, left, right),
        NotEq => compare(PyCmpOp::NotEq, left, right),
        And => PyExpr::BoolOp {
            op: PyBoolOp::And,
            values: vec![left, right],
        },
        // `L or R` short-circuits to `L if L else R`
        Or => PyExpr::IfExp {
            test: Box::new(left.clone()),
            body: Box::new(left),
            orelse: Box::new(right),
        },
    }
}

/// Splits a single ipairs/pairs loop variable into index and value names.
///
/// `k_v` splits at the first interior underscore; otherwise the first
/// character is the index and the remainder the value (`kv` becomes
/// `k, v`). Single-character names are left alone.
pub(crate) fn split_loop_var(id: &str) -> Option<(String, String)> {
    let mut indices = id.char_indices();
    indices.next()?;
    let (second, _) = indices.next()?;
    if let Some(pos) = id[second..].find('_') {
        let pos = second + pos;
        let value = &id[pos + 1..];
        if !value.is_empty() {
            return Some((id[..pos].to_string(), value.to_string()));
        }
    }
    Some((id[..second].to_string(), id[second..].to_string()))
}

/// `require("a/b/c")` to an import statement, per the delimiter priority
/// `/`, `.`, `\`.
fn lower_require(path: &str) -> PyStmt {
    let delim = ['/', '.', '\\'].into_iter().find(|d| path.contains(*d));
    let Some(delim) = delim else {
        return PyStmt::Import {
            names: vec![Alias::plain(path)],
        };
    };
    let parts: Vec<&str> = path.split(delim).filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => PyStmt::Import {
            names: vec![Alias::plain(path)],
        },
        [only] => PyStmt::Import {
            names: vec![Alias::plain(*only)],
        },
        [module @ .., name] => PyStmt::ImportFrom {
            module: module.join("."),
            names: vec![Alias::plain(*name)],
        },
    }
}

fn last_attr_segment(expr: &PyExpr) -> Option<&str> {
    match expr {
        PyExpr::Attribute { attr, .. } => Some(attr),
        _ => None,
    }
}

fn prepend(body: &mut Vec<PyStmt>, mut head: Vec<PyStmt>) {
    if head.is_empty() {
        return;
    }
    head.extend(std::mem::take(body));
    *body = head;
}

fn find_class_index(body: &[PyStmt], class: &str) -> Option<usize> {
    body.iter()
        .position(|stmt| matches!(stmt, PyStmt::ClassDef { name, .. } if name == class))
}

/// Rewrites `Base.init(self, ...)`, `Base:method(...)` and
/// `Cls.super.init(self, ...)` calls into `super()` calls.
fn rewrite_super_calls(body: &mut Vec<PyStmt>, class: &str, bases: &[String]) {
    walk_stmts(body, &mut |expr| {
        let PyExpr::Call { func, args, .. } = expr else {
            return;
        };
        let PyExpr::Attribute { value, attr } = func.as_mut() else {
            return;
        };

        let is_base_receiver = matches!(
            value.as_name(),
            Some(receiver) if bases.iter().any(|b| b == receiver)
        );
        let is_super_receiver = matches!(
            value.as_ref(),
            PyExpr::Attribute { value: inner, attr: super_attr }
                if super_attr == "super" && inner.as_name() == Some(class)
        );
        if !is_base_receiver && !is_super_receiver {
            return;
        }

        if attr == "init" {
            *attr = "__init__".to_string();
        }
        *value = Box::new(PyExpr::call(PyExpr::name("super"), Vec::new()));
        if args.first().and_then(PyExpr::as_name) == Some("self") {
            args.remove(0);
        }
    });
}

/// Post-order mutable walk over every expression in a statement slice.
fn walk_stmts(stmts: &mut [PyStmt], f: &mut impl FnMut(&mut PyExpr)) {
    for stmt in stmts {
        walk_stmt(stmt, f);
    }
}

fn walk_stmt(stmt: &mut PyStmt, f: &mut impl FnMut(&mut PyExpr)) {
    match stmt {
        PyStmt::FunctionDef {
            args,
            body,
            decorators,
            ..
        } => {
            for default in &mut args.defaults {
                walk_expr(default, f);
            }
            for default in args.kw_defaults.iter_mut().flatten() {
                walk_expr(default, f);
            }
            walk_stmts(body, f);
            for deco in decorators {
                walk_expr(deco, f);
            }
        }
        PyStmt::ClassDef {
            bases,
            body,
            decorators,
            ..
        } => {
            for base in bases {
                walk_expr(base, f);
            }
            walk_stmts(body, f);
            for deco in decorators {
                walk_expr(deco, f);
            }
        }
        PyStmt::Assign { targets, values } => {
            for t in targets {
                walk_expr(t, f);
            }
            for v in values {
                walk_expr(v, f);
            }
        }
        PyStmt::AugAssign { target, value, .. } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        PyStmt::Return { values } => {
            for v in values {
                walk_expr(v, f);
            }
        }
        PyStmt::If { test, body, orelse } | PyStmt::While { test, body, orelse } => {
            walk_expr(test, f);
            walk_stmts(body, f);
            walk_stmts(orelse, f);
        }
        PyStmt::For {
            targets,
            iter,
            body,
            orelse,
        } => {
            for t in targets {
                walk_expr(t, f);
            }
            walk_expr(iter, f);
            walk_stmts(body, f);
            walk_stmts(orelse, f);
        }
        PyStmt::Expr { value } => walk_expr(value, f),
        PyStmt::Break
        | PyStmt::Continue
        | PyStmt::Pass
        | PyStmt::Import { .. }
        | PyStmt::ImportFrom { .. }
        | PyStmt::Global { .. } => {}
    }
}

fn walk_expr(expr: &mut PyExpr, f: &mut impl FnMut(&mut PyExpr)) {
    match expr {
        PyExpr::Name { .. } | PyExpr::Constant { .. } => {}
        PyExpr::Call {
            func,
            args,
            keywords,
        } => {
            walk_expr(func, f);
            for arg in args.iter_mut() {
                walk_expr(arg, f);
            }
            for kw in keywords {
                walk_expr(&mut kw.value, f);
            }
        }
        PyExpr::Attribute { value, .. } => walk_expr(value, f),
        PyExpr::Subscript { value, slice } => {
            walk_expr(value, f);
            walk_expr(slice, f);
        }
        PyExpr::BinOp { left, right, .. } => {
            walk_expr(left, f);
            walk_expr(right, f);
        }
        PyExpr::BoolOp { values, .. } => {
            for v in values {
                walk_expr(v, f);
            }
        }
        PyExpr::UnaryOp { operand, .. } => walk_expr(operand, f),
        PyExpr::Compare {
            left, comparators, ..
        } => {
            walk_expr(left, f);
            for c in comparators {
                walk_expr(c, f);
            }
        }
        PyExpr::IfExp { test, body, orelse } => {
            walk_expr(test, f);
            walk_expr(body, f);
            walk_expr(orelse, f);
        }
        PyExpr::List { elts } | PyExpr::Tuple { elts } => {
            for e in elts {
                walk_expr(e, f);
            }
        }
        PyExpr::Dict { keys, values } => {
            for k in keys {
                walk_expr(k, f);
            }
            for v in values {
                walk_expr(v, f);
            }
        }
        PyExpr::Lambda { body, .. } => walk_expr(body, f),
        PyExpr::Starred { value } | PyExpr::FormattedValue { value } => walk_expr(value, f),
        PyExpr::JoinedStr { values } => {
            for v in values {
                walk_expr(v, f);
            }
        }
    }
    f(expr);
}
