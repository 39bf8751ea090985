// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Target-source emission.
//!
//! Depth-first serialization of a [`PyModule`] into indentation-correct
//! source text. Parsing the emitted text with the target language yields a
//! structurally equivalent tree, modulo parenthesization and whitespace.
//!
//! # Indentation
//!
//! Every block-forming statement bumps the indent level by one on entry
//! and restores it on exit; statements are prefixed with four spaces per
//! level. Empty bodies emit a `pass` marker to keep the file parseable.
//!
//! # Precedence
//!
//! Each expression is emitted with the minimum precedence its context
//! demands, threaded down the recursion. When a node's intrinsic
//! precedence is lower than required it is wrapped in parentheses.
//! Exponentiation is right-associative and gets the asymmetric treatment
//! on its left operand.
//!
//! # Strings
//!
//! Minimum-escape quoting: the emitter picks from `'`, `"`, `'''`, `"""`
//! the delimiter with the fewest occurrences inside the value; multi-line
//! values force triple quotes; unprintable characters are escape-encoded.

use crate::error::{Result, TranslateError};
use crate::py_ast::*;

/// Serializes a module to source text with a trailing newline.
pub fn unparse(module: &PyModule) -> Result<String> {
    let mut u = Unparser::new();
    for stmt in &module.body {
        u.stmt(stmt)?;
    }
    let mut out = u.out;
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Serializes a statement slice; used for hoist-deduplication signatures.
pub fn unparse_stmts(stmts: &[PyStmt]) -> Result<String> {
    let mut u = Unparser::new();
    for stmt in stmts {
        u.stmt(stmt)?;
    }
    Ok(u.out)
}

/// Serializes a single expression.
pub fn unparse_expr(expr: &PyExpr) -> Result<String> {
    let mut u = Unparser::new();
    u.expr(expr, Prec::Test)?;
    Ok(u.out)
}

/// The operator-precedence ladder of the target grammar, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Tuple,
    Test,
    Or,
    And,
    Not,
    Cmp,
    BOr,
    BXor,
    BAnd,
    Shift,
    Arith,
    Term,
    Factor,
    Power,
    Atom,
}

impl Prec {
    fn next(self) -> Prec {
        use Prec::*;
        match self {
            Tuple => Test,
            Test => Or,
            Or => And,
            And => Not,
            Not => Cmp,
            Cmp => BOr,
            BOr => BXor,
            BXor => BAnd,
            BAnd => Shift,
            Shift => Arith,
            Arith => Term,
            Term => Factor,
            Factor => Power,
            Power => Atom,
            Atom => Atom,
        }
    }
}

fn binop_token(op: PyBinOp) -> (&'static str, Prec) {
    match op {
        PyBinOp::Add => ("+", Prec::Arith),
        PyBinOp::Sub => ("-", Prec::Arith),
        PyBinOp::Mult => ("*", Prec::Term),
        PyBinOp::Div => ("/", Prec::Term),
        PyBinOp::FloorDiv => ("//", Prec::Term),
        PyBinOp::Mod => ("%", Prec::Term),
        PyBinOp::Pow => ("**", Prec::Power),
        PyBinOp::LShift => ("<<", Prec::Shift),
        PyBinOp::RShift => (">>", Prec::Shift),
        PyBinOp::BitAnd => ("&", Prec::BAnd),
        PyBinOp::BitOr => ("|", Prec::BOr),
        PyBinOp::BitXor => ("^", Prec::BXor),
    }
}

fn cmpop_token(op: PyCmpOp) -> &'static str {
    match op {
        PyCmpOp::Eq => "==",
        PyCmpOp::NotEq => "!=",
        PyCmpOp::Lt => "<",
        PyCmpOp::LtE => "<=",
        PyCmpOp::Gt => ">",
        PyCmpOp::GtE => ">=",
        PyCmpOp::In => "in",
        PyCmpOp::NotIn => "not in",
        PyCmpOp::Is => "is",
        PyCmpOp::IsNot => "is not",
    }
}

struct Unparser {
    out: String,
    indent: usize,
}

impl Unparser {
    fn new() -> Self {
        Unparser {
            out: String::new(),
            indent: 0,
        }
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Starts a fresh, indented line holding `text`.
    fn fill(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
    }

    /// Extra separation before definitions, as readable output expects.
    fn maybe_blank_line(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    /// Emits `:` plus an indented body, substituting `pass` when empty.
    fn block(&mut self, body: &[PyStmt]) -> Result<()> {
        self.write(":");
        self.indent += 1;
        if body.is_empty() {
            self.fill("pass");
        } else {
            for stmt in body {
                self.stmt(stmt)?;
            }
        }
        self.indent -= 1;
        Ok(())
    }

    fn comma_exprs(&mut self, exprs: &[PyExpr], required: Prec) -> Result<()> {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(e, required)?;
        }
        Ok(())
    }

    fn stmt(&mut self, stmt: &PyStmt) -> Result<()> {
        match stmt {
            PyStmt::FunctionDef {
                name,
                args,
                body,
                decorators,
            } => {
                self.maybe_blank_line();
                for deco in decorators {
                    self.fill("@");
                    self.expr(deco, Prec::Test)?;
                }
                self.fill("def ");
                self.write(name);
                self.write("(");
                self.arguments(args)?;
                self.write(")");
                self.block(body)?;
            }
            PyStmt::ClassDef {
                name,
                bases,
                body,
                decorators,
            } => {
                self.maybe_blank_line();
                for deco in decorators {
                    self.fill("@");
                    self.expr(deco, Prec::Test)?;
                }
                self.fill("class ");
                self.write(name);
                if !bases.is_empty() {
                    self.write("(");
                    self.comma_exprs(bases, Prec::Test)?;
                    self.write(")");
                }
                self.block(body)?;
            }
            PyStmt::Assign { targets, values } => {
                if targets.is_empty() || values.is_empty() {
                    return Err(TranslateError::UnparseError(
                        "assignment with no targets or no values".to_string(),
                    ));
                }
                self.fill("");
                self.comma_exprs(targets, Prec::Tuple)?;
                self.write(" = ");
                self.comma_exprs(values, Prec::Test)?;
            }
            PyStmt::AugAssign { target, op, value } => {
                self.fill("");
                self.expr(target, Prec::Tuple)?;
                let (tok, _) = binop_token(*op);
                self.write(" ");
                self.write(tok);
                self.write("= ");
                self.expr(value, Prec::Test)?;
            }
            PyStmt::Return { values } => {
                self.fill("return");
                if !values.is_empty() {
                    self.write(" ");
                    self.comma_exprs(values, Prec::Test)?;
                }
            }
            PyStmt::If { test, body, orelse } => {
                self.emit_if(test, body, orelse, false)?;
            }
            PyStmt::For {
                targets,
                iter,
                body,
                orelse,
            } => {
                self.fill("for ");
                for (i, t) in targets.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(t, Prec::Tuple)?;
                }
                self.write(" in ");
                self.expr(iter, Prec::Test)?;
                self.block(body)?;
                if !orelse.is_empty() {
                    self.fill("else");
                    self.block(orelse)?;
                }
            }
            PyStmt::While { test, body, orelse } => {
                self.fill("while ");
                self.expr(test, Prec::Test)?;
                self.block(body)?;
                if !orelse.is_empty() {
                    self.fill("else");
                    self.block(orelse)?;
                }
            }
            PyStmt::Break => self.fill("break"),
            PyStmt::Continue => self.fill("continue"),
            PyStmt::Pass => self.fill("pass"),
            PyStmt::Import { names } => {
                self.fill("import ");
                self.aliases(names);
            }
            PyStmt::ImportFrom { module, names } => {
                self.fill("from ");
                self.write(module);
                self.write(" import ");
                self.aliases(names);
            }
            PyStmt::Global { names } => {
                self.fill("global ");
                self.write(&names.join(", "));
            }
            PyStmt::Expr { value } => {
                self.fill("");
                self.expr(value, Prec::Test)?;
            }
        }
        Ok(())
    }

    fn aliases(&mut self, names: &[Alias]) {
        for (i, alias) in names.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&alias.name);
            if let Some(asname) = &alias.asname {
                self.write(" as ");
                self.write(asname);
            }
        }
    }

    fn emit_if(&mut self, test: &PyExpr, body: &[PyStmt], orelse: &[PyStmt], elif: bool) -> Result<()> {
        self.fill(if elif { "elif " } else { "if " });
        self.expr(test, Prec::Test)?;
        self.block(body)?;
        match orelse {
            [] => Ok(()),
            [PyStmt::If { test, body, orelse }] => self.emit_if(test, body, orelse, true),
            _ => {
                self.fill("else");
                self.block(orelse)
            }
        }
    }

    fn arguments(&mut self, args: &Arguments) -> Result<()> {
        let mut first = true;
        let pad = args.args.len().saturating_sub(args.defaults.len());
        for (i, name) in args.args.iter().enumerate() {
            if !first {
                self.write(", ");
            }
            first = false;
            self.write(name);
            if i >= pad {
                self.write("=");
                self.expr(&args.defaults[i - pad], Prec::Test)?;
            }
        }
        if args.vararg.is_some() || !args.kwonlyargs.is_empty() {
            if !first {
                self.write(", ");
            }
            first = false;
            self.write("*");
            if let Some(vararg) = &args.vararg {
                self.write(vararg);
            }
        }
        for (i, name) in args.kwonlyargs.iter().enumerate() {
            self.write(", ");
            self.write(name);
            if let Some(Some(default)) = args.kw_defaults.get(i) {
                self.write("=");
                self.expr(default, Prec::Test)?;
            }
        }
        if let Some(kwarg) = &args.kwarg {
            if !first {
                self.write(", ");
            }
            self.write("**");
            self.write(kwarg);
        }
        Ok(())
    }

    /// Emits an expression, parenthesizing when its intrinsic precedence
    /// is below what the context requires.
    fn expr(&mut self, expr: &PyExpr, required: Prec) -> Result<()> {
        match expr {
            PyExpr::Name { id } => {
                self.write(id);
            }
            PyExpr::Constant { value } => self.constant(value),
            PyExpr::Call {
                func,
                args,
                keywords,
            } => {
                self.expr(func, Prec::Atom)?;
                self.write("(");
                let mut comma = false;
                for arg in args {
                    if comma {
                        self.write(", ");
                    }
                    comma = true;
                    self.expr(arg, Prec::Test)?;
                }
                for kw in keywords {
                    if comma {
                        self.write(", ");
                    }
                    comma = true;
                    match &kw.arg {
                        Some(name) => {
                            self.write(name);
                            self.write("=");
                        }
                        None => self.write("**"),
                    }
                    self.expr(&kw.value, Prec::Test)?;
                }
                self.write(")");
            }
            PyExpr::Attribute { value, attr } => {
                self.expr(value, Prec::Atom)?;
                // an integer literal needs separation: `3 .bit_length()`
                if matches!(&**value, PyExpr::Constant { value: PyConst::Num(text) }
                    if text.chars().all(|c| c.is_ascii_digit()))
                {
                    self.write(" ");
                }
                self.write(".");
                self.write(attr);
            }
            PyExpr::Subscript { value, slice } => {
                self.expr(value, Prec::Atom)?;
                self.write("[");
                self.expr(slice, Prec::Tuple)?;
                self.write("]");
            }
            PyExpr::BinOp { left, op, right } => {
                let (tok, own) = binop_token(*op);
                self.parens_if(own < required, |u| {
                    let (left_req, right_req) = if *op == PyBinOp::Pow {
                        (own.next(), own)
                    } else {
                        (own, own.next())
                    };
                    u.expr(left, left_req)?;
                    u.write(" ");
                    u.write(tok);
                    u.write(" ");
                    u.expr(right, right_req)
                })?;
            }
            PyExpr::BoolOp { op, values } => {
                if values.len() < 2 {
                    return Err(TranslateError::UnparseError(
                        "boolean operation with fewer than two operands".to_string(),
                    ));
                }
                let (tok, own) = match op {
                    PyBoolOp::And => ("and", Prec::And),
                    PyBoolOp::Or => ("or", Prec::Or),
                };
                self.parens_if(own < required, |u| {
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            u.write(" ");
                            u.write(tok);
                            u.write(" ");
                        }
                        u.expr(value, own.next())?;
                    }
                    Ok(())
                })?;
            }
            PyExpr::UnaryOp { op, operand } => {
                let (tok, own, spaced) = match op {
                    PyUnaryOp::Not => ("not", Prec::Not, true),
                    PyUnaryOp::USub => ("-", Prec::Factor, false),
                    PyUnaryOp::Invert => ("~", Prec::Factor, false),
                };
                self.parens_if(own < required, |u| {
                    u.write(tok);
                    if spaced {
                        u.write(" ");
                    }
                    u.expr(operand, own)
                })?;
            }
            PyExpr::Compare {
                left,
                ops,
                comparators,
            } => {
                if ops.is_empty() || ops.len() != comparators.len() {
                    return Err(TranslateError::UnparseError(
                        "comparison operators and operands are misaligned".to_string(),
                    ));
                }
                self.parens_if(Prec::Cmp < required, |u| {
                    u.expr(left, Prec::Cmp.next())?;
                    for (op, comparator) in ops.iter().zip(comparators) {
                        u.write(" ");
                        u.write(cmpop_token(*op));
                        u.write(" ");
                        u.expr(comparator, Prec::Cmp.next())?;
                    }
                    Ok(())
                })?;
            }
            PyExpr::IfExp { test, body, orelse } => {
                self.parens_if(Prec::Test < required, |u| {
                    u.expr(body, Prec::Test.next())?;
                    u.write(" if ");
                    u.expr(test, Prec::Test.next())?;
                    u.write(" else ");
                    u.expr(orelse, Prec::Test)
                })?;
            }
            PyExpr::List { elts } => {
                self.write("[");
                self.comma_exprs(elts, Prec::Test)?;
                self.write("]");
            }
            PyExpr::Dict { keys, values } => {
                if keys.len() != values.len() {
                    return Err(TranslateError::UnparseError(
                        "dict keys and values are misaligned".to_string(),
                    ));
                }
                self.write("{");
                for (i, (k, v)) in keys.iter().zip(values).enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.expr(k, Prec::Test)?;
                    self.write(": ");
                    self.expr(v, Prec::Test)?;
                }
                self.write("}");
            }
            PyExpr::Tuple { elts } => {
                let needs_parens = elts.is_empty() || Prec::Tuple < required;
                self.parens_if(needs_parens, |u| {
                    if elts.len() == 1 {
                        u.expr(&elts[0], Prec::Test)?;
                        u.write(",");
                        return Ok(());
                    }
                    u.comma_exprs(elts, Prec::Test)
                })?;
            }
            PyExpr::Lambda { args, body } => {
                self.parens_if(Prec::Test < required, |u| {
                    u.write("lambda");
                    if !args.args.is_empty()
                        || args.vararg.is_some()
                        || !args.kwonlyargs.is_empty()
                        || args.kwarg.is_some()
                    {
                        u.write(" ");
                        u.arguments(args)?;
                    }
                    u.write(": ");
                    u.expr(body, Prec::Test)
                })?;
            }
            PyExpr::Starred { value } => {
                self.write("*");
                self.expr(value, Prec::BOr)?;
            }
            PyExpr::JoinedStr { values } => self.joined_str(values)?,
            PyExpr::FormattedValue { value } => {
                // only valid inside a JoinedStr
                self.write("{");
                let inner = unparse_expr_with(value, Prec::Test.next())?;
                self.write(&inner);
                self.write("}");
            }
        }
        Ok(())
    }

    fn parens_if<F>(&mut self, condition: bool, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if condition {
            self.write("(");
        }
        f(self)?;
        if condition {
            self.write(")");
        }
        Ok(())
    }

    fn constant(&mut self, value: &PyConst) {
        match value {
            PyConst::None => self.write("None"),
            PyConst::True => self.write("True"),
            PyConst::False => self.write("False"),
            PyConst::Num(text) => self.write(text),
            PyConst::Ellipsis => self.write("..."),
            PyConst::Str(s) => {
                let lit = quote_string(s);
                self.write(&lit);
            }
        }
    }

    fn joined_str(&mut self, values: &[PyExpr]) -> Result<()> {
        let mut content = String::new();
        for part in values {
            match part {
                PyExpr::Constant {
                    value: PyConst::Str(s),
                } => {
                    // unbraced literals double their braces to escape them
                    let escaped = escape_unprintable(s)
                        .replace('{', "{{")
                        .replace('}', "}}");
                    content.push_str(&escaped);
                }
                PyExpr::FormattedValue { value } => {
                    content.push('{');
                    let inner = unparse_expr_with(value, Prec::Test.next())?;
                    if inner.starts_with('{') {
                        content.push(' ');
                    }
                    content.push_str(&inner);
                    content.push('}');
                }
                other => {
                    return Err(TranslateError::UnparseError(format!(
                        "unexpected node inside a formatted string: {:?}",
                        other
                    )))
                }
            }
        }
        let quote = pick_quote(&content, content.contains('\n'));
        self.write("f");
        self.write(quote);
        self.write(&content);
        self.write(quote);
        Ok(())
    }
}

fn unparse_expr_with(expr: &PyExpr, required: Prec) -> Result<String> {
    let mut u = Unparser::new();
    u.expr(expr, required)?;
    Ok(u.out)
}

/// Escapes backslashes and unprintable characters, keeping `\n` and `\t`
/// literal so quote selection can see real newlines.
fn escape_unprintable(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' | '\t' => out.push(c),
            c if (c.is_control() || !c.is_ascii() && c.is_whitespace()) => {
                if (c as u32) <= 0xFF {
                    out.push_str(&format!("\\x{:02x}", c as u32));
                } else {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Picks the quote delimiter with the fewest occurrences inside `content`.
fn pick_quote(content: &str, multiline: bool) -> &'static str {
    let candidates: &[&'static str] = if multiline {
        &["'''", "\"\"\""]
    } else {
        &["'", "\"", "'''", "\"\"\""]
    };
    let mut best = candidates[0];
    let mut best_count = usize::MAX;
    for candidate in candidates {
        let count = content.matches(candidate).count();
        if count == 0 {
            return candidate;
        }
        if count < best_count {
            best_count = count;
            best = candidate;
        }
    }
    best
}

/// Renders a decoded string value as a quoted literal.
fn quote_string(s: &str) -> String {
    let escaped = escape_unprintable(s);
    let multiline = escaped.contains('\n');
    let quote = pick_quote(&escaped, multiline);
    let quote_char = quote.chars().next().unwrap();
    if quote.len() == 1 && escaped.contains(quote_char) {
        // no conflict-free delimiter: backslash every delimiter character
        let safe = escaped.replace(quote_char, &format!("\\{}", quote_char));
        return format!("{}{}{}", quote, safe, quote);
    }
    let mut body = escaped;
    if quote.len() == 3 {
        if body.contains(quote) {
            body = body.replace(quote_char, &format!("\\{}", quote_char));
        } else if body.ends_with(quote_char) {
            // a trailing delimiter character would merge with the closer
            body.pop();
            body.push('\\');
            body.push(quote_char);
        }
    }
    format!("{}{}{}", quote, body, quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(body: Vec<PyStmt>) -> PyModule {
        PyModule { body }
    }

    fn num(text: &str) -> PyExpr {
        PyExpr::num(text)
    }

    fn bin(left: PyExpr, op: PyBinOp, right: PyExpr) -> PyExpr {
        PyExpr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[test]
    fn indents_nested_blocks_four_spaces() {
        let m = module(vec![PyStmt::While {
            test: PyExpr::Constant {
                value: PyConst::True,
            },
            body: vec![PyStmt::Break],
            orelse: vec![],
        }]);
        assert_eq!(unparse(&m).unwrap(), "while True:\n    break\n");
    }

    #[test]
    fn empty_function_body_emits_pass() {
        let m = module(vec![PyStmt::FunctionDef {
            name: "f".to_string(),
            args: Arguments::default(),
            body: vec![],
            decorators: vec![],
        }]);
        assert_eq!(unparse(&m).unwrap(), "def f():\n    pass\n");
    }

    #[test]
    fn precedence_parenthesizes_looser_subexpressions() {
        // (1 + 2) * 3 must keep its parens; 1 + 2 * 3 must not gain any
        let grouped = bin(
            bin(num("1"), PyBinOp::Add, num("2")),
            PyBinOp::Mult,
            num("3"),
        );
        assert_eq!(unparse_expr(&grouped).unwrap(), "(1 + 2) * 3");

        let natural = bin(
            num("1"),
            PyBinOp::Add,
            bin(num("2"), PyBinOp::Mult, num("3")),
        );
        assert_eq!(unparse_expr(&natural).unwrap(), "1 + 2 * 3");
    }

    #[test]
    fn same_precedence_right_operand_is_parenthesized() {
        // a - (b - c)
        let e = bin(
            PyExpr::name("a"),
            PyBinOp::Sub,
            bin(PyExpr::name("b"), PyBinOp::Sub, PyExpr::name("c")),
        );
        assert_eq!(unparse_expr(&e).unwrap(), "a - (b - c)");
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ** 3 ** 4 re-parses with the same grouping
        let e = bin(
            num("2"),
            PyBinOp::Pow,
            bin(num("3"), PyBinOp::Pow, num("4")),
        );
        assert_eq!(unparse_expr(&e).unwrap(), "2 ** 3 ** 4");

        let grouped = bin(
            bin(num("2"), PyBinOp::Pow, num("3")),
            PyBinOp::Pow,
            num("4"),
        );
        assert_eq!(unparse_expr(&grouped).unwrap(), "(2 ** 3) ** 4");
    }

    #[test]
    fn if_expression_nests_with_parens() {
        let e = PyExpr::IfExp {
            test: Box::new(PyExpr::name("c")),
            body: Box::new(PyExpr::name("a")),
            orelse: Box::new(PyExpr::name("b")),
        };
        let call = PyExpr::call(PyExpr::name("f"), vec![e]);
        assert_eq!(unparse_expr(&call).unwrap(), "f(a if c else b)");
    }

    #[test]
    fn string_quotes_minimize_escapes() {
        assert_eq!(unparse_expr(&PyExpr::str("plain")).unwrap(), "'plain'");
        assert_eq!(
            unparse_expr(&PyExpr::str("it's here")).unwrap(),
            "\"it's here\""
        );
        assert_eq!(
            unparse_expr(&PyExpr::str("both ' and \"")).unwrap(),
            "'''both ' and \"'''"
        );
    }

    #[test]
    fn multiline_strings_force_triple_quotes() {
        let lit = unparse_expr(&PyExpr::str("a\nb")).unwrap();
        assert_eq!(lit, "'''a\nb'''");
    }

    #[test]
    fn fstring_doubles_literal_braces() {
        let e = PyExpr::JoinedStr {
            values: vec![
                PyExpr::str("a{b}"),
                PyExpr::FormattedValue {
                    value: Box::new(PyExpr::name("x")),
                },
            ],
        };
        assert_eq!(unparse_expr(&e).unwrap(), "f'a{{b}}{x}'");
    }

    #[test]
    fn elif_chains_flatten() {
        let m = module(vec![PyStmt::If {
            test: PyExpr::name("a"),
            body: vec![PyStmt::Pass],
            orelse: vec![PyStmt::If {
                test: PyExpr::name("b"),
                body: vec![PyStmt::Pass],
                orelse: vec![PyStmt::Pass],
            }],
        }]);
        let src = unparse(&m).unwrap();
        assert!(src.contains("elif b:"), "got:\n{}", src);
        assert!(src.contains("else:"), "got:\n{}", src);
    }

    #[test]
    fn arguments_emit_defaults_varargs_and_kwargs() {
        let args = Arguments {
            args: vec!["a".to_string(), "b".to_string()],
            defaults: vec![num("1")],
            vararg: Some("rest".to_string()),
            kwonlyargs: vec!["mode".to_string()],
            kw_defaults: vec![Some(PyExpr::str("r"))],
            kwarg: Some("extra".to_string()),
        };
        let m = module(vec![PyStmt::FunctionDef {
            name: "f".to_string(),
            args,
            body: vec![PyStmt::Pass],
            decorators: vec![],
        }]);
        let src = unparse(&m).unwrap();
        assert!(
            src.contains("def f(a, b=1, *rest, mode='r', **extra):"),
            "got:\n{}",
            src
        );
    }

    #[test]
    fn decorators_emit_one_per_line() {
        let m = module(vec![PyStmt::FunctionDef {
            name: "f".to_string(),
            args: Arguments::default(),
            body: vec![PyStmt::Pass],
            decorators: vec![PyExpr::name("staticmethod")],
        }]);
        let src = unparse(&m).unwrap();
        assert!(src.contains("@staticmethod\ndef f():"), "got:\n{}", src);
    }

    #[test]
    fn misaligned_compare_is_an_unparse_error() {
        let e = PyExpr::Compare {
            left: Box::new(PyExpr::name("a")),
            ops: vec![],
            comparators: vec![],
        };
        assert!(matches!(
            unparse_expr(&e),
            Err(TranslateError::UnparseError(_))
        ));
    }

    #[test]
    fn multi_assignment_joins_targets_and_values() {
        let m = module(vec![PyStmt::Assign {
            targets: vec![PyExpr::name("x"), PyExpr::name("y")],
            values: vec![num("1"), num("2")],
        }]);
        assert_eq!(unparse(&m).unwrap(), "x, y = 1, 2\n");
    }
}
