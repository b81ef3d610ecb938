//! Untyped AST produced by the parser and consumed by the typechecker.
//!
//! This is intentionally small: Stella has no user-defined type aliases,
//! modules, or statements beyond the single `return` form a function body
//! takes, so the tree is a direct transcription of Stella's expression
//! forms plus their concrete surface syntax.

use crate::lexer::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Bool(Span),
    Nat(Span),
    Unit(Span),
    Fun {
        params: Vec<TypeName>,
        result: Box<TypeName>,
        span: Span,
    },
    List(Box<TypeName>, Span),
    Tuple(Vec<TypeName>, Span),
    Record(Vec<(String, TypeName)>, Span),
    Sum(Box<TypeName>, Box<TypeName>, Span),
    Variant(Vec<(String, Option<TypeName>)>, Span),
}

impl TypeName {
    pub fn span(&self) -> Span {
        match self {
            TypeName::Bool(s)
            | TypeName::Nat(s)
            | TypeName::Unit(s)
            | TypeName::Fun { span: s, .. }
            | TypeName::List(_, s)
            | TypeName::Tuple(_, s)
            | TypeName::Record(_, s)
            | TypeName::Sum(_, _, s)
            | TypeName::Variant(_, s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeName,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCase {
    pub pattern: Pattern,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Inl(String, Span),
    Inr(String, Span),
    /// `<label = binder>` or bare `<label>` when the variant case has no payload.
    Variant(String, Option<String>, Span),
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Inl(_, s) | Pattern::Inr(_, s) | Pattern::Variant(_, _, s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Bool(bool, Span),
    Nat(u64, Span),
    Unit(Span),
    Var(String, Span),
    Succ(Box<Expr>, Span),
    Pred(Box<Expr>, Span),
    IsZero(Box<Expr>, Span),
    NatRec(Box<Expr>, Box<Expr>, Box<Expr>, Span),
    If(Box<Expr>, Box<Expr>, Box<Expr>, Span),
    Abstraction(Vec<ParamDecl>, Box<Expr>, Span),
    Application(Box<Expr>, Vec<Expr>, Span),
    /// `e;` appearing as a body: transparent pass-through.
    Seq(Box<Expr>, Span),
    Let(String, Box<Expr>, Box<Expr>, Span),
    List(Vec<Expr>, Span),
    Cons(Box<Expr>, Box<Expr>, Span),
    Head(Box<Expr>, Span),
    Tail(Box<Expr>, Span),
    IsEmpty(Box<Expr>, Span),
    Record(Vec<(String, Expr)>, Span),
    DotRecord(Box<Expr>, String, Span),
    Tuple(Vec<Expr>, Span),
    DotTuple(Box<Expr>, u64, Span),
    TypeAscription(Box<Expr>, TypeName, Span),
    Inl(Box<Expr>, Span),
    Inr(Box<Expr>, Span),
    Variant(String, Option<Box<Expr>>, Span),
    Match(Box<Expr>, Vec<MatchCase>, Span),
    Fix(Box<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        use Expr::*;
        match self {
            Bool(_, s) | Nat(_, s) | Unit(s) | Var(_, s) | Succ(_, s) | Pred(_, s)
            | IsZero(_, s) | NatRec(_, _, _, s) | If(_, _, _, s) | Abstraction(_, _, s)
            | Application(_, _, s) | Seq(_, s) | Let(_, _, _, s) | List(_, s) | Cons(_, _, s)
            | Head(_, s) | Tail(_, s) | IsEmpty(_, s) | Record(_, s) | DotRecord(_, _, s)
            | Tuple(_, s) | DotTuple(_, _, s) | TypeAscription(_, _, s) | Inl(_, s) | Inr(_, s)
            | Variant(_, _, s) | Match(_, _, s) | Fix(_, s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_type: TypeName,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub decls: Vec<FnDecl>,
}
