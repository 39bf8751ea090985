// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Recursive-descent Lua parser.
//!
//! Consumes the token stream from [`lexer`](crate::lexer) and produces the
//! raw [`Chunk`] defined in [`lua_ast`](crate::lua_ast). The parser emits
//! only the surface shapes of the grammar; the derived variants
//! (`Constructor`, `Initializer`, `Require`, `ForEnumerate`) are populated
//! afterwards by [`recognize`](crate::recognize).
//!
//! Binary expressions use the standard Lua operator-priority table with
//! right-associative `..` and `^`.

use crate::error::{Result, SourceContext, TranslateError};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::lua_ast::*;

/// Parses a complete Lua source string into a [`Chunk`].
pub fn parse(source: &str) -> Result<Chunk> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let body = parser.parse_block()?;
    parser.expect_kind(&TokenKind::Eof)?;
    Ok(Chunk { body })
}

/// Left/right binding priority of a binary operator.
///
/// Mirrors the table in the reference Lua parser; a smaller right priority
/// makes the operator right-associative.
fn binary_priority(kind: &TokenKind) -> Option<(BinaryOp, u8, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinaryOp::Or, 1, 1),
        TokenKind::And => (BinaryOp::And, 2, 2),
        TokenKind::Lt => (BinaryOp::Lt, 3, 3),
        TokenKind::Gt => (BinaryOp::Gt, 3, 3),
        TokenKind::LtEq => (BinaryOp::LtEq, 3, 3),
        TokenKind::GtEq => (BinaryOp::GtEq, 3, 3),
        TokenKind::NotEq => (BinaryOp::NotEq, 3, 3),
        TokenKind::EqEq => (BinaryOp::Eq, 3, 3),
        TokenKind::Pipe => (BinaryOp::BitOr, 4, 4),
        TokenKind::Tilde => (BinaryOp::BitXor, 5, 5),
        TokenKind::Amp => (BinaryOp::BitAnd, 6, 6),
        TokenKind::Shl => (BinaryOp::ShiftLeft, 7, 7),
        TokenKind::Shr => (BinaryOp::ShiftRight, 7, 7),
        TokenKind::Concat => (BinaryOp::Concat, 9, 8),
        TokenKind::Plus => (BinaryOp::Add, 10, 10),
        TokenKind::Minus => (BinaryOp::Sub, 10, 10),
        TokenKind::Star => (BinaryOp::Mul, 11, 11),
        TokenKind::Slash => (BinaryOp::FloatDiv, 11, 11),
        TokenKind::DoubleSlash => (BinaryOp::FloorDiv, 11, 11),
        TokenKind::Percent => (BinaryOp::Mod, 11, 11),
        TokenKind::Caret => (BinaryOp::Pow, 14, 13),
        _ => return None,
    };
    Some(entry)
}

const UNARY_PRIORITY: u8 = 12;

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    fn accept(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_kind(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.kind())))
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        match self.kind().clone() {
            TokenKind::Name(id) => {
                self.advance();
                Ok(id)
            }
            other => Err(self.error(format!("expected a name, found {:?}", other))),
        }
    }

    fn error(&self, message: impl Into<String>) -> TranslateError {
        let tok = self.current();
        TranslateError::ParseError {
            message: message.into(),
            line: tok.line,
            column: tok.column,
            file: None,
            source_context: Some(SourceContext::from_source(self.source, tok.line, tok.column)),
        }
    }

    fn span(&self) -> Span {
        Span::new(self.current().line, self.current().column)
    }

    /// True when the current token closes a block.
    fn block_follows(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::End
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::Until
                | TokenKind::Eof
        )
    }

    fn parse_block(&mut self) -> Result<Block> {
        let mut body = Vec::new();
        while !self.block_follows() {
            if self.check(&TokenKind::Return) {
                body.push(self.parse_return()?);
                break;
            }
            body.push(self.parse_statement()?);
        }
        Ok(Block { body })
    }

    fn parse_return(&mut self) -> Result<Stat> {
        let span = self.span();
        self.expect_kind(&TokenKind::Return)?;
        let values = if self.block_follows() || self.check(&TokenKind::Semi) {
            Vec::new()
        } else {
            self.parse_exprlist()?
        };
        self.accept(&TokenKind::Semi);
        Ok(Stat::with_span(StatKind::Return { values }, span))
    }

    fn parse_statement(&mut self) -> Result<Stat> {
        let span = self.span();
        let kind = match self.kind().clone() {
            TokenKind::Semi => {
                self.advance();
                StatKind::SemiColon
            }
            TokenKind::Break => {
                self.advance();
                StatKind::Break
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_name()?;
                StatKind::Goto { label }
            }
            TokenKind::DoubleColon => {
                self.advance();
                let id = self.expect_name()?;
                self.expect_kind(&TokenKind::DoubleColon)?;
                StatKind::Label { id }
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.advance();
                let test = self.parse_expr()?;
                self.expect_kind(&TokenKind::Do)?;
                let body = self.parse_block()?;
                self.expect_kind(&TokenKind::End)?;
                StatKind::While { test, body }
            }
            TokenKind::Do => {
                self.advance();
                let body = self.parse_block()?;
                self.expect_kind(&TokenKind::End)?;
                StatKind::Do { body }
            }
            TokenKind::Repeat => {
                self.advance();
                let body = self.parse_block()?;
                self.expect_kind(&TokenKind::Until)?;
                let test = self.parse_expr()?;
                StatKind::Repeat { body, test }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Function => self.parse_function_stat()?,
            TokenKind::Local => self.parse_local()?,
            _ => self.parse_expr_statement()?,
        };
        Ok(Stat::with_span(kind, span))
    }

    fn parse_if(&mut self) -> Result<StatKind> {
        self.expect_kind(&TokenKind::If)?;
        let test = self.parse_expr()?;
        self.expect_kind(&TokenKind::Then)?;
        let body = self.parse_block()?;
        let orelse = self.parse_orelse()?;
        Ok(StatKind::If { test, body, orelse })
    }

    fn parse_orelse(&mut self) -> Result<Option<Box<OrElse>>> {
        if self.accept(&TokenKind::ElseIf) {
            let test = self.parse_expr()?;
            self.expect_kind(&TokenKind::Then)?;
            let body = self.parse_block()?;
            let orelse = self.parse_orelse()?;
            return Ok(Some(Box::new(OrElse::ElseIf { test, body, orelse })));
        }
        if self.accept(&TokenKind::Else) {
            let body = self.parse_block()?;
            self.expect_kind(&TokenKind::End)?;
            return Ok(Some(Box::new(OrElse::Else(body))));
        }
        self.expect_kind(&TokenKind::End)?;
        Ok(None)
    }

    fn parse_for(&mut self) -> Result<StatKind> {
        self.expect_kind(&TokenKind::For)?;
        let first = self.expect_name()?;
        if self.accept(&TokenKind::Assign) {
            let start = self.parse_expr()?;
            self.expect_kind(&TokenKind::Comma)?;
            let stop = self.parse_expr()?;
            let step = if self.accept(&TokenKind::Comma) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect_kind(&TokenKind::Do)?;
            let body = self.parse_block()?;
            self.expect_kind(&TokenKind::End)?;
            return Ok(StatKind::Fornum {
                target: first,
                start,
                stop,
                step,
                body,
            });
        }

        let mut targets = vec![Expr::name(first)];
        while self.accept(&TokenKind::Comma) {
            targets.push(Expr::name(self.expect_name()?));
        }
        self.expect_kind(&TokenKind::In)?;
        let iter = self.parse_exprlist()?;
        self.expect_kind(&TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect_kind(&TokenKind::End)?;
        Ok(StatKind::Forin {
            targets,
            iter,
            body,
        })
    }

    fn parse_function_stat(&mut self) -> Result<StatKind> {
        self.expect_kind(&TokenKind::Function)?;
        let mut name = Expr::name(self.expect_name()?);
        while self.accept(&TokenKind::Dot) {
            let attr = self.expect_name()?;
            name = Expr::Index {
                value: Box::new(name),
                idx: Box::new(Expr::name(attr)),
                notation: IndexNotation::Dot,
            };
        }
        if self.accept(&TokenKind::Colon) {
            let method = self.expect_name()?;
            let (args, body) = self.parse_funcbody()?;
            return Ok(StatKind::Method {
                source: name,
                name: method,
                args,
                body,
            });
        }
        let (args, body) = self.parse_funcbody()?;
        Ok(StatKind::Function { name, args, body })
    }

    fn parse_local(&mut self) -> Result<StatKind> {
        self.expect_kind(&TokenKind::Local)?;
        if self.accept(&TokenKind::Function) {
            let name = self.expect_name()?;
            let (args, body) = self.parse_funcbody()?;
            return Ok(StatKind::LocalFunction { name, args, body });
        }
        let mut targets = vec![Expr::name(self.expect_name()?)];
        // Lua 5.4 attributes (`local x <const>`) are accepted and dropped
        self.skip_attrib()?;
        while self.accept(&TokenKind::Comma) {
            targets.push(Expr::name(self.expect_name()?));
            self.skip_attrib()?;
        }
        let values = if self.accept(&TokenKind::Assign) {
            self.parse_exprlist()?
        } else {
            Vec::new()
        };
        Ok(StatKind::LocalAssign { targets, values })
    }

    fn skip_attrib(&mut self) -> Result<()> {
        if self.accept(&TokenKind::Lt) {
            self.expect_name()?;
            self.expect_kind(&TokenKind::Gt)?;
        }
        Ok(())
    }

    fn parse_expr_statement(&mut self) -> Result<StatKind> {
        let first = self.parse_suffixed()?;
        if self.check(&TokenKind::Assign) || self.check(&TokenKind::Comma) {
            let mut targets = vec![first];
            while self.accept(&TokenKind::Comma) {
                targets.push(self.parse_suffixed()?);
            }
            self.expect_kind(&TokenKind::Assign)?;
            let values = self.parse_exprlist()?;
            return Ok(StatKind::Assign { targets, values });
        }
        match first {
            call @ (Expr::Call { .. } | Expr::Invoke { .. }) => Ok(StatKind::CallStat { call }),
            _ => Err(self.error("syntax error: expression is not a statement")),
        }
    }

    fn parse_exprlist(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.accept(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_binexpr(0)
    }

    fn parse_binexpr(&mut self, limit: u8) -> Result<Expr> {
        let mut left = match self.kind() {
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_binexpr(UNARY_PRIORITY)?;
                Expr::UnOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_binexpr(UNARY_PRIORITY)?;
                Expr::UnOp {
                    op: UnaryOp::Minus,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Hash => {
                self.advance();
                let operand = self.parse_binexpr(UNARY_PRIORITY)?;
                Expr::UnOp {
                    op: UnaryOp::Length,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Tilde => {
                self.advance();
                let operand = self.parse_binexpr(UNARY_PRIORITY)?;
                Expr::UnOp {
                    op: UnaryOp::BitNot,
                    operand: Box::new(operand),
                }
            }
            _ => self.parse_simple_expr()?,
        };

        while let Some((op, left_prio, right_prio)) = binary_priority(self.kind()) {
            if left_prio <= limit {
                break;
            }
            self.advance();
            let right = self.parse_binexpr(right_prio)?;
            left = Expr::BinOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_simple_expr(&mut self) -> Result<Expr> {
        match self.kind().clone() {
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Nil)
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::True)
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::False)
            }
            TokenKind::Number(text) => {
                self.advance();
                Ok(Expr::Number { text })
            }
            TokenKind::Str { value, delimiter } => {
                self.advance();
                Ok(Expr::Str { value, delimiter })
            }
            TokenKind::Ellipsis => {
                self.advance();
                Ok(Expr::Varargs)
            }
            TokenKind::Function => {
                self.advance();
                let (args, body) = self.parse_funcbody()?;
                Ok(Expr::AnonymousFunction { args, body })
            }
            TokenKind::LBrace => self.parse_table(),
            _ => self.parse_suffixed(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.kind().clone() {
            TokenKind::Name(id) => {
                self.advance();
                Ok(Expr::Name { id })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_kind(&TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(self.error(format!("unexpected token {:?}", other))),
        }
    }

    fn parse_suffixed(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.kind().clone() {
                TokenKind::Dot => {
                    self.advance();
                    let attr = self.expect_name()?;
                    expr = Expr::Index {
                        value: Box::new(expr),
                        idx: Box::new(Expr::name(attr)),
                        notation: IndexNotation::Dot,
                    };
                }
                TokenKind::LBracket => {
                    self.advance();
                    let idx = self.parse_expr()?;
                    self.expect_kind(&TokenKind::RBracket)?;
                    expr = Expr::Index {
                        value: Box::new(expr),
                        idx: Box::new(idx),
                        notation: IndexNotation::Square,
                    };
                }
                TokenKind::Colon => {
                    self.advance();
                    let func = self.expect_name()?;
                    let args = self.parse_callargs()?;
                    expr = Expr::Invoke {
                        source: Box::new(expr),
                        func,
                        args,
                    };
                }
                TokenKind::LParen | TokenKind::LBrace | TokenKind::Str { .. } => {
                    let args = self.parse_callargs()?;
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_callargs(&mut self) -> Result<Vec<Expr>> {
        match self.kind().clone() {
            TokenKind::LParen => {
                self.advance();
                let args = if self.check(&TokenKind::RParen) {
                    Vec::new()
                } else {
                    self.parse_exprlist()?
                };
                self.expect_kind(&TokenKind::RParen)?;
                Ok(args)
            }
            TokenKind::Str { value, delimiter } => {
                self.advance();
                Ok(vec![Expr::Str { value, delimiter }])
            }
            TokenKind::LBrace => Ok(vec![self.parse_table()?]),
            other => Err(self.error(format!("expected call arguments, found {:?}", other))),
        }
    }

    fn parse_table(&mut self) -> Result<Expr> {
        self.expect_kind(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let field = match self.kind().clone() {
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expr()?;
                    self.expect_kind(&TokenKind::RBracket)?;
                    self.expect_kind(&TokenKind::Assign)?;
                    let value = self.parse_expr()?;
                    Field {
                        key: Some(key),
                        value,
                        between_brackets: true,
                    }
                }
                TokenKind::Name(id)
                    if self.tokens.get(self.pos + 1).map(|t| &t.kind)
                        == Some(&TokenKind::Assign) =>
                {
                    self.advance();
                    self.advance();
                    let value = self.parse_expr()?;
                    Field {
                        key: Some(Expr::name(id)),
                        value,
                        between_brackets: false,
                    }
                }
                _ => Field {
                    key: None,
                    value: self.parse_expr()?,
                    between_brackets: false,
                },
            };
            fields.push(field);
            if !self.accept(&TokenKind::Comma) && !self.accept(&TokenKind::Semi) {
                break;
            }
        }
        self.expect_kind(&TokenKind::RBrace)?;
        Ok(Expr::Table { fields })
    }

    fn parse_funcbody(&mut self) -> Result<(Vec<Param>, Block)> {
        self.expect_kind(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                match self.kind().clone() {
                    TokenKind::Name(id) => {
                        self.advance();
                        args.push(Param::Name(id));
                    }
                    TokenKind::Ellipsis => {
                        self.advance();
                        args.push(Param::Varargs);
                        break;
                    }
                    other => {
                        return Err(self.error(format!("expected a parameter, found {:?}", other)))
                    }
                }
                if !self.accept(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect_kind(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        self.expect_kind(&TokenKind::End)?;
        Ok((args, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat_kinds(source: &str) -> Vec<StatKind> {
        parse(source)
            .unwrap()
            .body
            .body
            .into_iter()
            .map(|s| s.kind)
            .collect()
    }

    #[test]
    fn parses_local_assignment() {
        let stats = stat_kinds("local x, y = 1, 'two'");
        match &stats[0] {
            StatKind::LocalAssign { targets, values } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected LocalAssign, got {:?}", other),
        }
    }

    #[test]
    fn parses_method_declaration() {
        let stats = stat_kinds("function Animal:speak(text) return text end");
        match &stats[0] {
            StatKind::Method { source, name, args, .. } => {
                assert_eq!(source.as_name(), Some("Animal"));
                assert_eq!(name, "speak");
                assert_eq!(args, &vec![Param::Name("text".to_string())]);
            }
            other => panic!("expected Method, got {:?}", other),
        }
    }

    #[test]
    fn parses_dotted_function_names() {
        let stats = stat_kinds("function a.b.c() end");
        match &stats[0] {
            StatKind::Function { name, .. } => match name {
                Expr::Index { notation, .. } => assert_eq!(*notation, IndexNotation::Dot),
                other => panic!("expected Index name, got {:?}", other),
            },
            other => panic!("expected Function, got {:?}", other),
        }
    }

    #[test]
    fn parses_invoke_and_call() {
        let stats = stat_kinds("obj:method(1)\nprint('x')");
        assert!(matches!(
            &stats[0],
            StatKind::CallStat {
                call: Expr::Invoke { .. }
            }
        ));
        assert!(matches!(
            &stats[1],
            StatKind::CallStat {
                call: Expr::Call { .. }
            }
        ));
    }

    #[test]
    fn concat_is_right_associative() {
        let chunk = parse("x = a .. b .. c").unwrap();
        match &chunk.body.body[0].kind {
            StatKind::Assign { values, .. } => match &values[0] {
                Expr::BinOp { op, right, .. } => {
                    assert_eq!(*op, BinaryOp::Concat);
                    assert!(matches!(**right, Expr::BinOp { .. }));
                }
                other => panic!("expected BinOp, got {:?}", other),
            },
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let chunk = parse("x = 1 + 2 * 3").unwrap();
        match &chunk.body.body[0].kind {
            StatKind::Assign { values, .. } => match &values[0] {
                Expr::BinOp { op, right, .. } => {
                    assert_eq!(*op, BinaryOp::Add);
                    assert!(
                        matches!(&**right, Expr::BinOp { op: BinaryOp::Mul, .. }),
                        "rhs should be the multiplication"
                    );
                }
                other => panic!("expected BinOp, got {:?}", other),
            },
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn parses_if_elseif_else_chain() {
        let src = "if a then x = 1 elseif b then x = 2 else x = 3 end";
        let stats = stat_kinds(src);
        match &stats[0] {
            StatKind::If { orelse, .. } => match orelse.as_deref() {
                Some(OrElse::ElseIf { orelse, .. }) => {
                    assert!(matches!(orelse.as_deref(), Some(OrElse::Else(_))));
                }
                other => panic!("expected ElseIf, got {:?}", other),
            },
            other => panic!("expected If, got {:?}", other),
        }
    }

    #[test]
    fn parses_numeric_and_generic_for() {
        let stats = stat_kinds("for i = 1, 10, 2 do end\nfor k, v in pairs(t) do end");
        assert!(matches!(&stats[0], StatKind::Fornum { step: Some(_), .. }));
        match &stats[1] {
            StatKind::Forin { targets, iter, .. } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(iter.len(), 1);
            }
            other => panic!("expected Forin, got {:?}", other),
        }
    }

    #[test]
    fn parses_labels_and_goto() {
        let stats = stat_kinds("::top::\ngoto top");
        assert_eq!(
            stats[0],
            StatKind::Label {
                id: "top".to_string()
            }
        );
        assert_eq!(
            stats[1],
            StatKind::Goto {
                label: "top".to_string()
            }
        );
    }

    #[test]
    fn parses_table_field_shapes() {
        let chunk = parse("t = {1, a = 2, [k] = 3}").unwrap();
        match &chunk.body.body[0].kind {
            StatKind::Assign { values, .. } => match &values[0] {
                Expr::Table { fields } => {
                    assert_eq!(fields.len(), 3);
                    assert!(fields[0].key.is_none());
                    assert!(fields[1].key.is_some() && !fields[1].between_brackets);
                    assert!(fields[2].between_brackets);
                }
                other => panic!("expected Table, got {:?}", other),
            },
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn call_with_string_argument_sugar() {
        let stats = stat_kinds("require 'lib.util'");
        match &stats[0] {
            StatKind::CallStat {
                call: Expr::Call { args, .. },
            } => {
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected CallStat, got {:?}", other),
        }
    }

    #[test]
    fn rejects_stray_expression_statement() {
        assert!(parse("1 + 2").is_err());
    }

    #[test]
    fn parse_error_reports_position() {
        let err = parse("local x = (1 + ").unwrap_err();
        match err {
            TranslateError::ParseError { line, .. } => assert_eq!(line, 1),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }
}
