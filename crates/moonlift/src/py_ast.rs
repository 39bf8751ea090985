// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree types for the emitted Python.
//!
//! This tree is produced by [`lower`](crate::lower), reshaped by
//! [`rewrite`](crate::rewrite), and serialized by
//! [`unparse`](crate::unparse). It covers the subset of the target
//! language the lowering can produce, plus the expression shapes
//! (f-strings, starred values, keyword arguments) the unparser must be
//! able to emit for embedders that build trees directly.
//!
//! Statements own their children; there is no parent back-pointer and no
//! interior mutability, so trees are plain values that can be cloned,
//! compared and serialized freely.

use serde::{Deserialize, Serialize};

/// A target-language compilation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PyModule {
    /// Top-level statements.
    pub body: Vec<PyStmt>,
}

/// An `import` alias: `name` or `name as asname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    /// The imported name.
    pub name: String,
    /// The binding name, when renamed.
    pub asname: Option<String>,
}

impl Alias {
    /// An alias without renaming.
    pub fn plain(name: impl Into<String>) -> Self {
        Alias {
            name: name.into(),
            asname: None,
        }
    }
}

/// A keyword argument in a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// The argument name; `None` means `**value`.
    pub arg: Option<String>,
    /// The argument value.
    pub value: PyExpr,
}

/// A function parameter list.
///
/// Emission order follows the target grammar: positionals with aligned
/// defaults, then `*vararg`, then keyword-only parameters with defaults,
/// then `**kwarg`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Arguments {
    /// Positional parameter names.
    pub args: Vec<String>,
    /// Defaults for the trailing positionals.
    pub defaults: Vec<PyExpr>,
    /// The `*args` name, if present.
    pub vararg: Option<String>,
    /// Keyword-only parameter names.
    pub kwonlyargs: Vec<String>,
    /// Defaults for the keyword-only parameters, aligned by index.
    pub kw_defaults: Vec<Option<PyExpr>>,
    /// The `**kwargs` name, if present.
    pub kwarg: Option<String>,
}

impl Arguments {
    /// A parameter list of plain positional names.
    pub fn positional<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arguments {
            args: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// All statement shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PyStmt {
    /// `def name(args): body`
    FunctionDef {
        /// Function name.
        name: String,
        /// Parameter list.
        args: Arguments,
        /// Body (emitted as `pass` when empty).
        body: Vec<PyStmt>,
        /// Decorator expressions, outermost first.
        decorators: Vec<PyExpr>,
    },
    /// `class name(bases): body`
    ClassDef {
        /// Class name.
        name: String,
        /// Base class expressions.
        bases: Vec<PyExpr>,
        /// Body (emitted as `pass` when empty).
        body: Vec<PyStmt>,
        /// Decorator expressions, outermost first.
        decorators: Vec<PyExpr>,
    },
    /// `t1, t2 = v1, v2`
    Assign {
        /// Assignment targets.
        targets: Vec<PyExpr>,
        /// Assigned values; more than one emits a comma list.
        values: Vec<PyExpr>,
    },
    /// `target op= value`
    AugAssign {
        /// The target.
        target: PyExpr,
        /// The operator.
        op: PyBinOp,
        /// The value.
        value: PyExpr,
    },
    /// `return v1, v2` (bare `return` when empty)
    Return {
        /// Returned values.
        values: Vec<PyExpr>,
    },
    /// `if test: body [else: orelse]`
    ///
    /// An `orelse` holding a single `If` emits as `elif`.
    If {
        /// Condition.
        test: PyExpr,
        /// Then-branch.
        body: Vec<PyStmt>,
        /// Else-branch (possibly a chained `If`).
        orelse: Vec<PyStmt>,
    },
    /// `for targets in iter: body [else: orelse]`
    For {
        /// Loop targets; more than one emits a comma list.
        targets: Vec<PyExpr>,
        /// The iterated expression.
        iter: PyExpr,
        /// Loop body.
        body: Vec<PyStmt>,
        /// Loop else-branch.
        orelse: Vec<PyStmt>,
    },
    /// `while test: body [else: orelse]`
    While {
        /// Condition.
        test: PyExpr,
        /// Loop body.
        body: Vec<PyStmt>,
        /// Loop else-branch.
        orelse: Vec<PyStmt>,
    },
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `pass`
    Pass,
    /// `import a, b`
    Import {
        /// Imported modules.
        names: Vec<Alias>,
    },
    /// `from module import a, b`
    ImportFrom {
        /// The source module path.
        module: String,
        /// Imported names.
        names: Vec<Alias>,
    },
    /// `global a, b`
    Global {
        /// Declared names.
        names: Vec<String>,
    },
    /// An expression in statement position.
    Expr {
        /// The expression.
        value: PyExpr,
    },
}

/// Constant values carried by [`PyExpr::Constant`].
///
/// Numbers keep their verbatim source text (the spec's `kind = "i"`
/// rendering); strings carry the decoded value (`kind = "s"`), quoted by
/// the unparser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PyConst {
    /// `None`
    None,
    /// `True`
    True,
    /// `False`
    False,
    /// A numeric literal rendered verbatim.
    Num(String),
    /// A string literal, decoded.
    Str(String),
    /// `...`
    Ellipsis,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PyBinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PyUnaryOp {
    /// `-x`
    USub,
    /// `not x`
    Not,
    /// `~x`
    Invert,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PyCmpOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtE,
    /// `>`
    Gt,
    /// `>=`
    GtE,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `is`
    Is,
    /// `is not`
    IsNot,
}

/// Boolean (short-circuit) operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PyBoolOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// All expression shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PyExpr {
    /// An identifier.
    Name {
        /// The identifier text.
        id: String,
    },
    /// A literal constant.
    Constant {
        /// The value.
        value: PyConst,
    },
    /// `func(args, kw=...)`
    Call {
        /// The called expression.
        func: Box<PyExpr>,
        /// Positional arguments.
        args: Vec<PyExpr>,
        /// Keyword arguments.
        keywords: Vec<Keyword>,
    },
    /// `value.attr`
    Attribute {
        /// The object.
        value: Box<PyExpr>,
        /// The attribute name.
        attr: String,
    },
    /// `value[slice]`
    Subscript {
        /// The subscripted value.
        value: Box<PyExpr>,
        /// The index expression.
        slice: Box<PyExpr>,
    },
    /// A binary operation.
    BinOp {
        /// Left operand.
        left: Box<PyExpr>,
        /// Operator.
        op: PyBinOp,
        /// Right operand.
        right: Box<PyExpr>,
    },
    /// A chain of `and`/`or`.
    BoolOp {
        /// The operator.
        op: PyBoolOp,
        /// Two or more operands.
        values: Vec<PyExpr>,
    },
    /// A unary operation.
    UnaryOp {
        /// The operator.
        op: PyUnaryOp,
        /// The operand.
        operand: Box<PyExpr>,
    },
    /// A comparison chain.
    Compare {
        /// Leftmost operand.
        left: Box<PyExpr>,
        /// Operators, one per comparator.
        ops: Vec<PyCmpOp>,
        /// Right-hand operands.
        comparators: Vec<PyExpr>,
    },
    /// `body if test else orelse`
    IfExp {
        /// The condition.
        test: Box<PyExpr>,
        /// Value when true.
        body: Box<PyExpr>,
        /// Value when false.
        orelse: Box<PyExpr>,
    },
    /// `[a, b]`
    List {
        /// Elements.
        elts: Vec<PyExpr>,
    },
    /// `{k: v}`
    Dict {
        /// Keys, aligned with values.
        keys: Vec<PyExpr>,
        /// Values.
        values: Vec<PyExpr>,
    },
    /// `(a, b)`
    Tuple {
        /// Elements.
        elts: Vec<PyExpr>,
    },
    /// `lambda args: body`
    Lambda {
        /// Parameter list.
        args: Arguments,
        /// The body expression.
        body: Box<PyExpr>,
    },
    /// `*value`
    Starred {
        /// The unpacked value.
        value: Box<PyExpr>,
    },
    /// An f-string: constants interleaved with formatted values.
    JoinedStr {
        /// The parts (`Constant` or `FormattedValue`).
        values: Vec<PyExpr>,
    },
    /// One `{expr}` slot inside an f-string.
    FormattedValue {
        /// The interpolated expression.
        value: Box<PyExpr>,
    },
}

impl PyExpr {
    /// Creates a name expression.
    pub fn name(id: impl Into<String>) -> Self {
        PyExpr::Name { id: id.into() }
    }

    /// Creates a string constant.
    pub fn str(value: impl Into<String>) -> Self {
        PyExpr::Constant {
            value: PyConst::Str(value.into()),
        }
    }

    /// Creates a verbatim numeric constant.
    pub fn num(text: impl Into<String>) -> Self {
        PyExpr::Constant {
            value: PyConst::Num(text.into()),
        }
    }

    /// Creates a call with positional arguments only.
    pub fn call(func: PyExpr, args: Vec<PyExpr>) -> Self {
        PyExpr::Call {
            func: Box::new(func),
            args,
            keywords: Vec::new(),
        }
    }

    /// Creates an attribute access.
    pub fn attr(value: PyExpr, attr: impl Into<String>) -> Self {
        PyExpr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    /// Returns the identifier if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PyExpr::Name { id } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let e = PyExpr::call(
            PyExpr::attr(PyExpr::name("t"), "append"),
            vec![PyExpr::num("1")],
        );
        match e {
            PyExpr::Call { func, args, .. } => {
                assert!(matches!(*func, PyExpr::Attribute { .. }));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn arguments_positional_builder() {
        let args = Arguments::positional(["self", "name"]);
        assert_eq!(args.args, vec!["self", "name"]);
        assert!(args.vararg.is_none());
    }

    #[test]
    fn trees_round_trip_through_json() {
        let module = PyModule {
            body: vec![PyStmt::Assign {
                targets: vec![PyExpr::name("x")],
                values: vec![PyExpr::num("1")],
            }],
        };
        let json = serde_json::to_string(&module).unwrap();
        let back: PyModule = serde_json::from_str(&json).unwrap();
        assert_eq!(module, back);
    }
}
