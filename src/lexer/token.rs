use colored::Colorize;

/// A source location, tracked as `(line, column)` pairs (both 0-indexed)
/// plus the full source text, so diagnostics can render the offending
/// line without re-reading the file.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: (usize, usize),
    pub end: (usize, usize),
    pub source: String,
}

impl Span {
    pub fn new(start: (usize, usize), end: (usize, usize), source: String) -> Self {
        Span { start, end, source }
    }

    /// Render `msg` as a one-line-context error report pointing at this span.
    pub fn to_string(&self, msg: impl ToString) -> String {
        let Span { start, end, source } = self;
        let lines = source.lines().collect::<Vec<_>>();
        let Some(line_str) = lines.get(start.0) else {
            return format!("{}:{} - {}", start.0 + 1, start.1 + 1, msg.to_string());
        };

        let split_at = start.1.min(line_str.len());
        let (left, right) = line_str.split_at(split_at);
        let underline_len = if start.0 == end.0 {
            end.1.saturating_sub(start.1).max(1)
        } else {
            right.len().max(1)
        };
        let underline_len = underline_len.min(right.len().max(1));
        let (marked, rest) = right.split_at(underline_len.min(right.len()));

        format!(
            "{line:>4} | {left}{marked}{rest}\n     | {pad}{carets} {msg}",
            line = start.0 + 1,
            left = left,
            marked = marked.to_string().red().bold(),
            rest = rest,
            pad = " ".repeat(left.len()),
            carets = "^".repeat(underline_len.max(1)).red(),
            msg = msg.to_string()
        )
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            source: self.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // literals & identifiers
    Ident(String, Span),
    Number(u64, Span),

    // keywords
    Fn(Span),
    Return(Span),
    Let(Span),
    In(Span),
    If(Span),
    Then(Span),
    Else(Span),
    True(Span),
    False(Span),
    Unit(Span),
    Succ(Span),
    Pred(Span),
    IsZero(Span),
    Cons(Span),
    Head(Span),
    Tail(Span),
    IsEmpty(Span),
    Inl(Span),
    Inr(Span),
    Match(Span),
    Fix(Span),
    As(Span),
    Rec(Span),
    BoolType(Span),
    NatType(Span),
    UnitType(Span),

    // punctuation
    LParen(Span),
    RParen(Span),
    LBrace(Span),
    RBrace(Span),
    LBracket(Span),
    RBracket(Span),
    LAngleVariant(Span), // "<|"
    RAngleVariant(Span), // "|>"
    LAngle(Span),
    RAngle(Span),
    Comma(Span),
    Colon(Span),
    ColonColon(Span),
    Semicolon(Span),
    Equals(Span),
    FatArrow(Span), // "=>"
    Arrow(Span),    // "->"
    Dot(Span),
    Plus(Span),
    Pipe(Span),

    Eof(Span),
}

impl Token {
    pub fn span(&self) -> Span {
        use Token::*;
        match self {
            Ident(_, s) | Number(_, s) | Fn(s) | Return(s) | Let(s) | In(s) | If(s) | Then(s)
            | Else(s) | True(s) | False(s) | Unit(s) | Succ(s) | Pred(s) | IsZero(s)
            | Cons(s) | Head(s) | Tail(s) | IsEmpty(s) | Inl(s) | Inr(s) | Match(s) | Fix(s)
            | As(s) | Rec(s) | BoolType(s) | NatType(s) | UnitType(s) | LParen(s) | RParen(s)
            | LBrace(s) | RBrace(s) | LBracket(s) | RBracket(s) | LAngleVariant(s)
            | RAngleVariant(s) | LAngle(s) | RAngle(s) | Comma(s) | Colon(s) | ColonColon(s)
            | Semicolon(s) | Equals(s) | FatArrow(s) | Arrow(s) | Dot(s) | Plus(s) | Pipe(s)
            | Eof(s) => s.clone(),
        }
    }

    /// A short, human readable label used in parse error messages.
    pub fn label(&self) -> String {
        use Token::*;
        match self {
            Ident(name, _) => format!("identifier '{name}'"),
            Number(n, _) => format!("number '{n}'"),
            Eof(_) => "end of input".to_string(),
            other => format!("'{other:?}'"),
        }
    }
}
