//! The closed diagnostic taxonomy. Every variant here corresponds to one of
//! the `ERROR_*` codes a Stella checker is expected to raise; message
//! bodies follow the same `CODE\nField: value` convention throughout so a
//! caller can always read the code off the first line.

use std::{error::Error, fmt::Display};

use crate::lexer::Span;
use super::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCheckError {
    MissingMain,
    UndefinedVariable { name: String, span: Span },
    UnexpectedTypeForExpression { expected: String, actual: String, span: Span },
    NotAFunction { span: Span },
    NotARecord { span: Span },
    NotAList { span: Span },
    UnexpectedLambda { expected: String, span: Span },
    UnexpectedTuple { expected: String, span: Span },
    UnexpectedTupleLength { expected: usize, actual: usize, span: Span },
    UnexpectedRecord { expected: String, span: Span },
    UnexpectedRecordFields { span: Span },
    MissingRecordFields { span: Span },
    UnexpectedList { expected: String, span: Span },
    AmbiguousList { span: Span },
    UnexpectedInjection { expected: String, span: Span },
    AmbiguousSumType { span: Span },
    UnexpectedVariant { expected: String, span: Span },
    UnexpectedVariantLabel { label: String, span: Span },
    AmbiguousVariantType { span: Span },
    UnexpectedFieldAccess { label: String, span: Span },
    TupleIndexOutOfBounds { span: Span },
    IncorrectNumberOfArguments { expected: usize, actual: usize, span: Span },
    UnexpectedTypeForParameter { span: Span },
    IllegalEmptyMatching { span: Span },
    NonExhaustiveMatchPatterns { span: Span },
    UnexpectedPatternForType { pattern: String, match_type: String, span: Span },
}

impl TypeCheckError {
    /// The bare `ERROR_*` code, useful for tests that only care about the
    /// diagnostic class and not its exact rendering.
    pub fn code(&self) -> &'static str {
        use TypeCheckError::*;
        match self {
            MissingMain => "ERROR_MISSING_MAIN",
            UndefinedVariable { .. } => "ERROR_UNDEFINED_VARIABLE",
            UnexpectedTypeForExpression { .. } => "ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION",
            NotAFunction { .. } => "ERROR_NOT_A_FUNCTION",
            NotARecord { .. } => "ERROR_NOT_A_RECORD",
            NotAList { .. } => "ERROR_NOT_A_LIST",
            UnexpectedLambda { .. } => "ERROR_UNEXPECTED_LAMBDA",
            UnexpectedTuple { .. } => "ERROR_UNEXPECTED_TUPLE",
            UnexpectedTupleLength { .. } => "ERROR_UNEXPECTED_TUPLE_LENGTH",
            UnexpectedRecord { .. } => "ERROR_UNEXPECTED_RECORD",
            UnexpectedRecordFields { .. } => "ERROR_UNEXPECTED_RECORD_FIELDS",
            MissingRecordFields { .. } => "ERROR_MISSING_RECORD_FIELDS",
            UnexpectedList { .. } => "ERROR_UNEXPECTED_LIST",
            AmbiguousList { .. } => "ERROR_AMBIGUOUS_LIST",
            UnexpectedInjection { .. } => "ERROR_UNEXPECTED_INJECTION",
            AmbiguousSumType { .. } => "ERROR_AMBIGUOUS_SUM_TYPE",
            UnexpectedVariant { .. } => "ERROR_UNEXPECTED_VARIANT",
            UnexpectedVariantLabel { .. } => "ERROR_UNEXPECTED_VARIANT_LABEL",
            AmbiguousVariantType { .. } => "ERROR_AMBIGUOUS_VARIANT_TYPE",
            UnexpectedFieldAccess { .. } => "ERROR_UNEXPECTED_FIELD_ACCESS",
            TupleIndexOutOfBounds { .. } => "ERROR_TUPLE_INDEX_OUT_OF_BOUNDS",
            IncorrectNumberOfArguments { .. } => "ERROR_INCORRECT_NUMBER_OF_ARGUMENTS",
            UnexpectedTypeForParameter { .. } => "ERROR_UNEXPECTED_TYPE_FOR_PARAMETER",
            IllegalEmptyMatching { .. } => "ERROR_ILLEGAL_EMPTY_MATCHING",
            NonExhaustiveMatchPatterns { .. } => "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS",
            UnexpectedPatternForType { .. } => "ERROR_UNEXPECTED_PATTERN_FOR_TYPE",
        }
    }

    pub fn span(&self) -> Option<&Span> {
        use TypeCheckError::*;
        match self {
            MissingMain => None,
            UndefinedVariable { span, .. }
            | UnexpectedTypeForExpression { span, .. }
            | NotAFunction { span }
            | NotARecord { span }
            | NotAList { span }
            | UnexpectedLambda { span, .. }
            | UnexpectedTuple { span, .. }
            | UnexpectedTupleLength { span, .. }
            | UnexpectedRecord { span, .. }
            | UnexpectedRecordFields { span }
            | MissingRecordFields { span }
            | UnexpectedList { span, .. }
            | AmbiguousList { span }
            | UnexpectedInjection { span, .. }
            | AmbiguousSumType { span }
            | UnexpectedVariant { span, .. }
            | UnexpectedVariantLabel { span, .. }
            | AmbiguousVariantType { span }
            | UnexpectedFieldAccess { span, .. }
            | TupleIndexOutOfBounds { span }
            | IncorrectNumberOfArguments { span, .. }
            | UnexpectedTypeForParameter { span }
            | IllegalEmptyMatching { span }
            | NonExhaustiveMatchPatterns { span }
            | UnexpectedPatternForType { span, .. } => Some(span),
        }
    }

    fn body(&self) -> String {
        use TypeCheckError::*;
        match self {
            MissingMain => "ERROR_MISSING_MAIN".to_string(),
            UndefinedVariable { name, .. } => format!("ERROR_UNDEFINED_VARIABLE\n{name}"),
            UnexpectedTypeForExpression { expected, actual, .. } => {
                format!("ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION\nExpected: {expected}\nActual: {actual}")
            }
            NotAFunction { .. } => "ERROR_NOT_A_FUNCTION".to_string(),
            NotARecord { .. } => "ERROR_NOT_A_RECORD".to_string(),
            NotAList { .. } => "ERROR_NOT_A_LIST".to_string(),
            UnexpectedLambda { expected, .. } => {
                format!("ERROR_UNEXPECTED_LAMBDA\nGot lambda while expecting {expected}")
            }
            UnexpectedTuple { expected, .. } => {
                format!("ERROR_UNEXPECTED_TUPLE\nExpected: {expected}")
            }
            UnexpectedTupleLength { expected, actual, .. } => {
                format!("ERROR_UNEXPECTED_TUPLE_LENGTH\nExpected: {expected}\nActual: {actual}")
            }
            UnexpectedRecord { expected, .. } => {
                format!("ERROR_UNEXPECTED_RECORD\nExpected: {expected}")
            }
            UnexpectedRecordFields { .. } => "ERROR_UNEXPECTED_RECORD_FIELDS".to_string(),
            MissingRecordFields { .. } => "ERROR_MISSING_RECORD_FIELDS".to_string(),
            UnexpectedList { expected, .. } => {
                format!("ERROR_UNEXPECTED_LIST\nExpected: {expected}")
            }
            AmbiguousList { .. } => "ERROR_AMBIGUOUS_LIST\nMissing list type context".to_string(),
            UnexpectedInjection { expected, .. } => {
                format!("ERROR_UNEXPECTED_INJECTION\nGot injection while expecting {expected}")
            }
            AmbiguousSumType { .. } => "ERROR_AMBIGUOUS_SUM_TYPE".to_string(),
            UnexpectedVariant { expected, .. } => {
                format!("ERROR_UNEXPECTED_VARIANT\nGot variant while expecting {expected}")
            }
            UnexpectedVariantLabel { label, .. } => {
                format!("ERROR_UNEXPECTED_VARIANT_LABEL {label}")
            }
            AmbiguousVariantType { .. } => "ERROR_AMBIGUOUS_VARIANT_TYPE".to_string(),
            UnexpectedFieldAccess { .. } => "ERROR_UNEXPECTED_FIELD_ACCESS".to_string(),
            TupleIndexOutOfBounds { .. } => "ERROR_TUPLE_INDEX_OUT_OF_BOUNDS".to_string(),
            IncorrectNumberOfArguments { expected, actual, .. } => {
                format!("ERROR_INCORRECT_NUMBER_OF_ARGUMENTS\nExpected: {expected}\nActual: {actual}")
            }
            UnexpectedTypeForParameter { .. } => "ERROR_UNEXPECTED_TYPE_FOR_PARAMETER".to_string(),
            IllegalEmptyMatching { .. } => "ERROR_ILLEGAL_EMPTY_MATCHING".to_string(),
            NonExhaustiveMatchPatterns { .. } => "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS".to_string(),
            UnexpectedPatternForType { pattern, match_type, .. } => format!(
                "ERROR_UNEXPECTED_PATTERN_FOR_TYPE\nPattern: {pattern}\nMatch expression type: {match_type}"
            ),
        }
    }
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = self.body();
        match self.span() {
            Some(span) => f.write_str(span.to_string(body).as_str()),
            None => f.write_str(&body),
        }
    }
}

impl Error for TypeCheckError {}

pub type TypeResult<T> = Result<T, TypeCheckError>;

pub fn describe_type(ty: &Type) -> String {
    format!("{ty:?}")
}
