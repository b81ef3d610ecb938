//! Exhaustiveness analysis for `match`. Given the scrutinee's type and the
//! case list, returns each case's binder type so the checker can extend
//! its scope accordingly.

use std::collections::HashSet;

use crate::lexer::Span;
use crate::parser::ast::{MatchCase, Pattern};

use super::error::{describe_type, TypeCheckError, TypeResult};
use super::types::Type;

pub fn check_exhaustive(
    scrutinee: &Type,
    cases: &[MatchCase],
    span: &Span,
) -> TypeResult<Vec<Type>> {
    match scrutinee {
        Type::Sum { left, right } => check_sum(left, right, cases, span),
        Type::Variant(case_types) => check_variant(case_types, cases, span),
        other => Err(TypeCheckError::UnexpectedPatternForType {
            pattern: cases
                .first()
                .map(|c| pattern_label(&c.pattern))
                .unwrap_or_default(),
            match_type: describe_type(other),
            span: span.clone(),
        }),
    }
}

fn check_sum(
    left: &Type,
    right: &Type,
    cases: &[MatchCase],
    span: &Span,
) -> TypeResult<Vec<Type>> {
    let mut binder_types = Vec::with_capacity(cases.len());
    let mut seen_inl = false;
    let mut seen_inr = false;

    for case in cases {
        match &case.pattern {
            Pattern::Inl(_, _) => {
                seen_inl = true;
                binder_types.push(left.clone());
            }
            Pattern::Inr(_, _) => {
                seen_inr = true;
                binder_types.push(right.clone());
            }
            other => {
                return Err(TypeCheckError::UnexpectedPatternForType {
                    pattern: pattern_label(other),
                    match_type: format!(
                        "{:?}",
                        Type::Sum {
                            left: Box::new(left.clone()),
                            right: Box::new(right.clone())
                        }
                    ),
                    span: other.span(),
                })
            }
        }
    }

    if !seen_inl || !seen_inr {
        return Err(TypeCheckError::NonExhaustiveMatchPatterns { span: span.clone() });
    }

    Ok(binder_types)
}

fn check_variant(
    case_types: &[(String, Type)],
    cases: &[MatchCase],
    span: &Span,
) -> TypeResult<Vec<Type>> {
    let mut binder_types = Vec::with_capacity(cases.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for case in cases {
        let Pattern::Variant(label, _, pattern_span) = &case.pattern else {
            return Err(TypeCheckError::UnexpectedPatternForType {
                pattern: pattern_label(&case.pattern),
                match_type: format!("{:?}", Type::Variant(case_types.to_vec())),
                span: case.pattern.span(),
            });
        };

        let Some((_, ty)) = case_types.iter().find(|(name, _)| name == label) else {
            return Err(TypeCheckError::UnexpectedPatternForType {
                pattern: label.clone(),
                match_type: format!("{:?}", Type::Variant(case_types.to_vec())),
                span: pattern_span.clone(),
            });
        };

        seen.insert(label.as_str());
        binder_types.push(ty.clone());
    }

    let all_labels: HashSet<&str> = case_types.iter().map(|(l, _)| l.as_str()).collect();
    if seen != all_labels {
        return Err(TypeCheckError::NonExhaustiveMatchPatterns { span: span.clone() });
    }

    Ok(binder_types)
}

fn pattern_label(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Inl(_, _) => "inl".to_string(),
        Pattern::Inr(_, _) => "inr".to_string(),
        Pattern::Variant(label, _, _) => label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn span() -> Span {
        Span::default()
    }

    fn case(pattern: Pattern) -> MatchCase {
        use crate::parser::ast::Expr;
        MatchCase {
            pattern,
            body: Expr::Unit(span()),
        }
    }

    #[test]
    fn sum_requires_both_arms() {
        let left = Type::Nat;
        let right = Type::Bool;
        let cases = vec![case(Pattern::Inl("n".into(), span()))];
        let err = check_sum(&left, &right, &cases, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS");
    }

    #[test]
    fn sum_with_both_arms_succeeds() {
        let left = Type::Nat;
        let right = Type::Bool;
        let cases = vec![
            case(Pattern::Inl("n".into(), span())),
            case(Pattern::Inr("b".into(), span())),
        ];
        let types = check_sum(&left, &right, &cases, &span()).unwrap();
        assert_eq!(types, vec![Type::Nat, Type::Bool]);
    }

    #[test]
    fn variant_missing_a_case_is_nonexhaustive() {
        let case_types = vec![("some".to_string(), Type::Nat), ("none".to_string(), Type::Unit)];
        let cases = vec![case(Pattern::Variant("some".into(), Some("n".into()), span()))];
        let err = check_variant(&case_types, &cases, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS");
    }

    #[test]
    fn variant_unknown_label_is_pattern_for_type_error() {
        let case_types = vec![("some".to_string(), Type::Nat)];
        let cases = vec![case(Pattern::Variant("other".into(), None, span()))];
        let err = check_variant(&case_types, &cases, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_PATTERN_FOR_TYPE");
    }
}
