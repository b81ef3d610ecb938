//! # Parser
//!
//! A small hand-written recursive-descent parser turning the token stream
//! from `lexer` into the `ast` tree the typechecker consumes. As with the
//! lexer, this module is a thin collaborator to the typechecker —
//! correctness over cleverness.

pub mod ast;

use std::{error::Error, fmt::Display};

use crate::lexer::{Span, Token};
use ast::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Span,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.position.to_string(&self.message).as_str())
    }
}

impl Error for ParseError {}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl ToString) -> ParseError {
        ParseError {
            message: message.to_string(),
            position: self.peek().span(),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error(format!("expected {expected}, found {}", self.peek().label()))
    }
}

macro_rules! expect {
    ($self:expr, $variant:ident, $expected:literal) => {{
        match $self.peek().clone() {
            Token::$variant(span) => {
                $self.advance();
                span
            }
            _ => return Err($self.unexpected($expected)),
        }
    }};
}

macro_rules! eat {
    ($self:expr, $variant:ident) => {
        matches!($self.peek(), Token::$variant(_))
    };
}

impl Parser {
    pub fn parse_program(&mut self) -> PResult<Program> {
        let mut decls = vec![];
        while !eat!(self, Eof) {
            decls.push(self.parse_fn_decl()?);
        }
        Ok(Program { decls })
    }

    fn parse_fn_decl(&mut self) -> PResult<FnDecl> {
        let start = expect!(self, Fn, "'fn'");
        let (name, _) = self.parse_ident()?;
        expect!(self, LParen, "'('");
        let params = self.parse_param_list()?;
        expect!(self, RParen, "')'");
        expect!(self, Colon, "':'");
        let return_type = self.parse_type()?;
        expect!(self, LBrace, "'{'");
        let body = self.parse_body()?;
        let end = expect!(self, RBrace, "'}'");

        Ok(FnDecl {
            name,
            params,
            return_type,
            body,
            span: start.merge(&end),
        })
    }

    fn parse_param_list(&mut self) -> PResult<Vec<ParamDecl>> {
        let mut params = vec![];
        if eat!(self, RParen) {
            return Ok(params);
        }
        loop {
            params.push(self.parse_param_decl()?);
            if eat!(self, Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_param_decl(&mut self) -> PResult<ParamDecl> {
        let (name, start) = self.parse_ident()?;
        expect!(self, Colon, "':'");
        let ty = self.parse_type()?;
        Ok(ParamDecl {
            name,
            span: start.merge(&ty.span()),
            ty,
        })
    }

    fn parse_ident(&mut self) -> PResult<(String, Span)> {
        match self.peek().clone() {
            Token::Ident(name, span) => {
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// A function body is either `return <expr> ;` (sugar, produces the
    /// inner expression directly) or `<expr> ;` (the `Seq` form, a bare
    /// terminating-semicolon expression).
    fn parse_body(&mut self) -> PResult<Expr> {
        if eat!(self, Return) {
            self.advance();
            let expr = self.parse_ascribed_expr()?;
            expect!(self, Semicolon, "';'");
            Ok(expr)
        } else {
            let expr = self.parse_ascribed_expr()?;
            let span = expect!(self, Semicolon, "';'");
            Ok(Expr::Seq(Box::new(expr.clone()), expr.span().merge(&span)))
        }
    }

    /// `expr ("as" type)?`
    fn parse_ascribed_expr(&mut self) -> PResult<Expr> {
        let expr = self.parse_postfix_expr()?;
        if eat!(self, As) {
            self.advance();
            let ty = self.parse_type()?;
            let span = expr.span().merge(&ty.span());
            return Ok(Expr::TypeAscription(Box::new(expr), ty, span));
        }
        Ok(expr)
    }

    /// `primary ( "(" args ")" | "." label | "." index )*`
    fn parse_postfix_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            match self.peek().clone() {
                Token::LParen(_) => {
                    self.advance();
                    let args = self.parse_expr_list(&Token::RParen(Span::default()))?;
                    let end = expect!(self, RParen, "')'");
                    let span = expr.span().merge(&end);
                    expr = Expr::Application(Box::new(expr), args, span);
                }
                Token::Dot(_) => {
                    self.advance();
                    match self.peek().clone() {
                        Token::Number(n, span) => {
                            self.advance();
                            let full = expr.span().merge(&span);
                            expr = Expr::DotTuple(Box::new(expr), n, full);
                        }
                        Token::Ident(label, span) => {
                            self.advance();
                            let full = expr.span().merge(&span);
                            expr = Expr::DotRecord(Box::new(expr), label, full);
                        }
                        _ => return Err(self.unexpected("a field label or tuple index")),
                    }
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_expr_list(&mut self, terminator: &Token) -> PResult<Vec<Expr>> {
        let mut items = vec![];
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(terminator) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_ascribed_expr()?);
            if eat!(self, Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(items)
    }

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        match self.peek().clone() {
            Token::True(s) => {
                self.advance();
                Ok(Expr::Bool(true, s))
            }
            Token::False(s) => {
                self.advance();
                Ok(Expr::Bool(false, s))
            }
            Token::Unit(s) => {
                self.advance();
                Ok(Expr::Unit(s))
            }
            Token::Number(n, s) => {
                self.advance();
                Ok(Expr::Nat(n, s))
            }
            Token::Ident(name, s) => {
                self.advance();
                Ok(Expr::Var(name, s))
            }
            Token::LParen(s) => {
                self.advance();
                let inner = self.parse_ascribed_expr()?;
                expect!(self, RParen, "')'");
                let _ = s;
                Ok(inner)
            }
            Token::Succ(s) => self.parse_unary_builtin(s, |e, span| Expr::Succ(e, span)),
            Token::Pred(s) => self.parse_unary_builtin(s, |e, span| Expr::Pred(e, span)),
            Token::IsZero(s) => self.parse_unary_builtin(s, |e, span| Expr::IsZero(e, span)),
            Token::Head(s) => self.parse_unary_builtin(s, |e, span| Expr::Head(e, span)),
            Token::Tail(s) => self.parse_unary_builtin(s, |e, span| Expr::Tail(e, span)),
            Token::IsEmpty(s) => self.parse_unary_builtin(s, |e, span| Expr::IsEmpty(e, span)),
            Token::Inl(s) => self.parse_unary_builtin(s, |e, span| Expr::Inl(e, span)),
            Token::Inr(s) => self.parse_unary_builtin(s, |e, span| Expr::Inr(e, span)),
            Token::Fix(s) => self.parse_unary_builtin(s, |e, span| Expr::Fix(e, span)),
            Token::Cons(s) => {
                self.advance();
                expect!(self, LParen, "'('");
                let head = self.parse_ascribed_expr()?;
                expect!(self, Comma, "','");
                let tail = self.parse_ascribed_expr()?;
                let end = expect!(self, RParen, "')'");
                Ok(Expr::Cons(Box::new(head), Box::new(tail), s.merge(&end)))
            }
            Token::NatType(s) => {
                self.advance();
                expect!(self, ColonColon, "'::'");
                expect!(self, Rec, "'rec'");
                expect!(self, LParen, "'('");
                let n = self.parse_ascribed_expr()?;
                expect!(self, Comma, "','");
                let z = self.parse_ascribed_expr()?;
                expect!(self, Comma, "','");
                let step = self.parse_ascribed_expr()?;
                let end = expect!(self, RParen, "')'");
                Ok(Expr::NatRec(
                    Box::new(n),
                    Box::new(z),
                    Box::new(step),
                    s.merge(&end),
                ))
            }
            Token::If(s) => {
                self.advance();
                let cond = self.parse_ascribed_expr()?;
                expect!(self, Then, "'then'");
                let then_branch = self.parse_ascribed_expr()?;
                expect!(self, Else, "'else'");
                let else_branch = self.parse_ascribed_expr()?;
                let span = s.merge(&else_branch.span());
                Ok(Expr::If(
                    Box::new(cond),
                    Box::new(then_branch),
                    Box::new(else_branch),
                    span,
                ))
            }
            Token::Fn(s) => {
                self.advance();
                expect!(self, LParen, "'('");
                let params = self.parse_param_list()?;
                expect!(self, RParen, "')'");
                expect!(self, LBrace, "'{'");
                let body = self.parse_body()?;
                let end = expect!(self, RBrace, "'}'");
                Ok(Expr::Abstraction(params, Box::new(body), s.merge(&end)))
            }
            Token::Let(s) => {
                self.advance();
                let (name, _) = self.parse_ident()?;
                expect!(self, Equals, "'='");
                let rhs = self.parse_ascribed_expr()?;
                expect!(self, In, "'in'");
                let body = self.parse_ascribed_expr()?;
                let span = s.merge(&body.span());
                Ok(Expr::Let(name, Box::new(rhs), Box::new(body), span))
            }
            Token::LBracket(s) => {
                self.advance();
                let items = self.parse_expr_list(&Token::RBracket(Span::default()))?;
                let end = expect!(self, RBracket, "']'");
                Ok(Expr::List(items, s.merge(&end)))
            }
            Token::LBrace(s) => self.parse_brace_expr(s),
            Token::LAngle(s) => self.parse_variant_expr(s),
            Token::Match(s) => self.parse_match_expr(s),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_unary_builtin(
        &mut self,
        start: Span,
        build: impl FnOnce(Box<Expr>, Span) -> Expr,
    ) -> PResult<Expr> {
        self.advance();
        expect!(self, LParen, "'('");
        let inner = self.parse_ascribed_expr()?;
        let end = expect!(self, RParen, "')'");
        Ok(build(Box::new(inner), start.merge(&end)))
    }

    /// Record and tuple literals share the `{ ... }` delimiter; an empty
    /// brace or a leading `ident "="` disambiguates a record, everything
    /// else parses as a tuple.
    fn parse_brace_expr(&mut self, start: Span) -> PResult<Expr> {
        self.advance();
        if eat!(self, RBrace) {
            let end = expect!(self, RBrace, "'}'");
            return Ok(Expr::Tuple(vec![], start.merge(&end)));
        }

        let is_record = matches!(self.peek(), Token::Ident(_, _))
            && matches!(self.tokens.get(self.pos + 1), Some(Token::Equals(_)));

        if is_record {
            let mut fields = vec![];
            loop {
                let (label, _) = self.parse_ident()?;
                expect!(self, Equals, "'='");
                let value = self.parse_ascribed_expr()?;
                fields.push((label, value));
                if eat!(self, Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            let end = expect!(self, RBrace, "'}'");
            Ok(Expr::Record(fields, start.merge(&end)))
        } else {
            let items = self.parse_expr_list(&Token::RBrace(Span::default()))?;
            let end = expect!(self, RBrace, "'}'");
            Ok(Expr::Tuple(items, start.merge(&end)))
        }
    }

    /// `<label = expr>` variant construction.
    fn parse_variant_expr(&mut self, start: Span) -> PResult<Expr> {
        self.advance();
        let (label, _) = self.parse_ident()?;
        let payload = if eat!(self, Equals) {
            self.advance();
            Some(Box::new(self.parse_ascribed_expr()?))
        } else {
            None
        };
        let end = expect!(self, RAngle, "'>'");
        Ok(Expr::Variant(label, payload, start.merge(&end)))
    }

    fn parse_match_expr(&mut self, start: Span) -> PResult<Expr> {
        self.advance();
        let scrutinee = self.parse_ascribed_expr()?;
        expect!(self, LBrace, "'{'");
        let mut cases = vec![];
        loop {
            if eat!(self, RBrace) {
                break;
            }
            cases.push(self.parse_match_case()?);
            if eat!(self, Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let end = expect!(self, RBrace, "'}'");
        Ok(Expr::Match(Box::new(scrutinee), cases, start.merge(&end)))
    }

    fn parse_match_case(&mut self) -> PResult<MatchCase> {
        let pattern = self.parse_pattern()?;
        expect!(self, FatArrow, "'=>'");
        let body = self.parse_ascribed_expr()?;
        Ok(MatchCase { pattern, body })
    }

    fn parse_pattern(&mut self) -> PResult<Pattern> {
        match self.peek().clone() {
            Token::Inl(s) => {
                self.advance();
                expect!(self, LParen, "'('");
                let (binder, _) = self.parse_ident()?;
                let end = expect!(self, RParen, "')'");
                Ok(Pattern::Inl(binder, s.merge(&end)))
            }
            Token::Inr(s) => {
                self.advance();
                expect!(self, LParen, "'('");
                let (binder, _) = self.parse_ident()?;
                let end = expect!(self, RParen, "')'");
                Ok(Pattern::Inr(binder, s.merge(&end)))
            }
            Token::LAngle(s) => {
                self.advance();
                let (label, _) = self.parse_ident()?;
                let binder = if eat!(self, Equals) {
                    self.advance();
                    let (name, _) = self.parse_ident()?;
                    Some(name)
                } else {
                    None
                };
                let end = expect!(self, RAngle, "'>'");
                Ok(Pattern::Variant(label, binder, s.merge(&end)))
            }
            _ => Err(self.unexpected("a pattern ('inl(..)', 'inr(..)' or '<label = ..>')")),
        }
    }

    // --- types -----------------------------------------------------------

    fn parse_type(&mut self) -> PResult<TypeName> {
        let base = self.parse_type_atom()?;
        if eat!(self, Plus) {
            self.advance();
            let right = self.parse_type()?;
            let span = base.span().merge(&right.span());
            return Ok(TypeName::Sum(Box::new(base), Box::new(right), span));
        }
        Ok(base)
    }

    fn parse_type_atom(&mut self) -> PResult<TypeName> {
        match self.peek().clone() {
            Token::BoolType(s) => {
                self.advance();
                Ok(TypeName::Bool(s))
            }
            Token::NatType(s) => {
                self.advance();
                Ok(TypeName::Nat(s))
            }
            Token::UnitType(s) => {
                self.advance();
                Ok(TypeName::Unit(s))
            }
            Token::LParen(s) => {
                self.advance();
                let inner = self.parse_type()?;
                let _ = s;
                expect!(self, RParen, "')'");
                Ok(inner)
            }
            Token::LBracket(s) => {
                self.advance();
                let inner = self.parse_type()?;
                let end = expect!(self, RBracket, "']'");
                Ok(TypeName::List(Box::new(inner), s.merge(&end)))
            }
            Token::Fn(s) => {
                self.advance();
                expect!(self, LParen, "'('");
                let mut params = vec![];
                if !eat!(self, RParen) {
                    loop {
                        params.push(self.parse_type()?);
                        if eat!(self, Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                expect!(self, RParen, "')'");
                expect!(self, Arrow, "'->'");
                let result = self.parse_type()?;
                let span = s.merge(&result.span());
                Ok(TypeName::Fun {
                    params,
                    result: Box::new(result),
                    span,
                })
            }
            Token::LBrace(s) => self.parse_brace_type(s),
            Token::LAngleVariant(s) => self.parse_variant_type(s),
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_brace_type(&mut self, start: Span) -> PResult<TypeName> {
        self.advance();
        if eat!(self, RBrace) {
            let end = expect!(self, RBrace, "'}'");
            return Ok(TypeName::Tuple(vec![], start.merge(&end)));
        }

        let is_record = matches!(self.peek(), Token::Ident(_, _))
            && matches!(self.tokens.get(self.pos + 1), Some(Token::Colon(_)));

        if is_record {
            let mut fields = vec![];
            loop {
                let (label, _) = self.parse_ident()?;
                expect!(self, Colon, "':'");
                let ty = self.parse_type()?;
                fields.push((label, ty));
                if eat!(self, Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            let end = expect!(self, RBrace, "'}'");
            Ok(TypeName::Record(fields, start.merge(&end)))
        } else {
            let mut types = vec![];
            loop {
                types.push(self.parse_type()?);
                if eat!(self, Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            let end = expect!(self, RBrace, "'}'");
            Ok(TypeName::Tuple(types, start.merge(&end)))
        }
    }

    fn parse_variant_type(&mut self, start: Span) -> PResult<TypeName> {
        self.advance();
        let mut cases = vec![];
        if !eat!(self, RAngleVariant) {
            loop {
                let (label, _) = self.parse_ident()?;
                let ty = if eat!(self, Colon) {
                    self.advance();
                    Some(self.parse_type()?)
                } else {
                    None
                };
                cases.push((label, ty));
                if eat!(self, Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let end = expect!(self, RAngleVariant, "'|>'");
        Ok(TypeName::Variant(cases, start.merge(&end)))
    }
}

pub fn parse(tokens: Vec<Token>) -> PResult<Program> {
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_src(src: &str) -> Program {
        let tokens = Lexer::new(src).lex().expect("should lex");
        parse(tokens).expect("should parse")
    }

    #[test]
    fn parses_identity_function() {
        let program = parse_src("fn main(x: Nat): Nat { return succ(x); }");
        assert_eq!(program.decls.len(), 1);
        assert_eq!(program.decls[0].name, "main");
    }

    #[test]
    fn parses_seq_body() {
        let program = parse_src("fn main(x: Nat): Nat { x; }");
        match &program.decls[0].body {
            Expr::Seq(_, _) => {}
            other => panic!("expected Seq, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_and_tuple_literals() {
        let program = parse_src("fn main(x: Nat): Nat { return {a = 1, b = true}.a; }");
        match &program.decls[0].body {
            Expr::DotRecord(inner, label, _) => {
                assert_eq!(label, "a");
                assert!(matches!(**inner, Expr::Record(_, _)));
            }
            other => panic!("expected DotRecord, got {other:?}"),
        }
    }

    #[test]
    fn parses_match_with_sum_patterns() {
        let program = parse_src(
            "fn main(x: Nat + Bool): Nat { return match x { inl(n) => n, inr(b) => 0 }; }",
        );
        match &program.decls[0].body {
            Expr::Match(_, cases, _) => assert_eq!(cases.len(), 2),
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[test]
    fn parses_variant_type_and_pattern() {
        let program = parse_src(
            "fn main(x: <| some : Nat, none |>): Nat { return match x { <some = n> => n, <none> => 0 }; }",
        );
        assert_eq!(program.decls.len(), 1);
    }
}
