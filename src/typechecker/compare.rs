//! The structural comparator. Parenthesized types never reach this
//! function (the parser elides them during AST construction), so there is
//! nothing to unwrap here; `Type` is already the "unwound" representation
//! this comparison works with.

use crate::lexer::Span;

use super::error::{describe_type, TypeCheckError, TypeResult};
use super::types::Type;

/// `compare(expected, actual)` — success iff the two are structurally
/// equal, otherwise the most specific diagnostic derivable from the shape
/// mismatch. Absent `expected` is a no-op (synthesis).
pub fn compare(expected: Option<&Type>, actual: &Type, span: &Span) -> TypeResult<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    if std::mem::discriminant(expected) != std::mem::discriminant(actual) {
        return Err(shape_mismatch(expected, actual, span));
    }

    match (expected, actual) {
        (Type::Bool, Type::Bool) | (Type::Nat, Type::Nat) | (Type::Unit, Type::Unit) => Ok(()),
        (Type::List(e), Type::List(a)) => compare(Some(e), a, span),
        (Type::Tuple(e), Type::Tuple(a)) => {
            if e.len() != a.len() {
                return Err(TypeCheckError::UnexpectedTupleLength {
                    expected: e.len(),
                    actual: a.len(),
                    span: span.clone(),
                });
            }
            for (et, at) in e.iter().zip(a.iter()) {
                compare(Some(et), at, span)?;
            }
            Ok(())
        }
        (Type::Record(e), Type::Record(a)) => {
            if e.len() > a.len() {
                return Err(TypeCheckError::MissingRecordFields { span: span.clone() });
            }
            if e.len() < a.len() {
                return Err(TypeCheckError::UnexpectedRecordFields { span: span.clone() });
            }
            for ((elabel, etype), (alabel, atype)) in e.iter().zip(a.iter()) {
                if elabel != alabel {
                    return Err(TypeCheckError::UnexpectedRecordFields { span: span.clone() });
                }
                if compare(Some(etype), atype, span).is_err() {
                    return Err(TypeCheckError::UnexpectedRecordFields { span: span.clone() });
                }
            }
            Ok(())
        }
        (
            Type::Fun { params: ep, result: er },
            Type::Fun { params: ap, result: ar },
        ) => {
            if ep.len() != ap.len() {
                return Err(TypeCheckError::UnexpectedTypeForExpression {
                    expected: describe_type(expected),
                    actual: describe_type(actual),
                    span: span.clone(),
                });
            }
            for (et, at) in ep.iter().zip(ap.iter()) {
                compare(Some(et), at, span)?;
            }
            compare(Some(er), ar, span)
        }
        (
            Type::Sum { left: el, right: er },
            Type::Sum { left: al, right: ar },
        ) => {
            compare(Some(el), al, span)?;
            compare(Some(er), ar, span)
        }
        (Type::Variant(e), Type::Variant(a)) => {
            let mut e_sorted = e.clone();
            let mut a_sorted = a.clone();
            e_sorted.sort_by(|x, y| x.0.cmp(&y.0));
            a_sorted.sort_by(|x, y| x.0.cmp(&y.0));
            if e_sorted.iter().map(|(l, _)| l).collect::<Vec<_>>()
                != a_sorted.iter().map(|(l, _)| l).collect::<Vec<_>>()
            {
                return Err(TypeCheckError::UnexpectedTypeForExpression {
                    expected: describe_type(expected),
                    actual: describe_type(actual),
                    span: span.clone(),
                });
            }
            for ((_, etype), (_, atype)) in e_sorted.iter().zip(a_sorted.iter()) {
                compare(Some(etype), atype, span)?;
            }
            Ok(())
        }
        _ => unreachable!("discriminants matched above"),
    }
}

fn shape_mismatch(expected: &Type, actual: &Type, span: &Span) -> TypeCheckError {
    let expected_desc = describe_type(expected);
    let actual_desc = describe_type(actual);
    match expected {
        Type::Fun { .. } => TypeCheckError::UnexpectedLambda {
            expected: expected_desc,
            span: span.clone(),
        },
        Type::Tuple(_) => TypeCheckError::UnexpectedTuple {
            expected: expected_desc,
            span: span.clone(),
        },
        Type::Record(_) => TypeCheckError::UnexpectedRecord {
            expected: expected_desc,
            span: span.clone(),
        },
        Type::List(_) => TypeCheckError::UnexpectedList {
            expected: expected_desc,
            span: span.clone(),
        },
        _ => TypeCheckError::UnexpectedTypeForExpression {
            expected: expected_desc,
            actual: actual_desc,
            span: span.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn reflexivity_holds_for_every_shape() {
        let types = vec![
            Type::Bool,
            Type::Nat,
            Type::Unit,
            Type::List(Box::new(Type::Nat)),
            Type::Tuple(vec![Type::Nat, Type::Bool]),
            Type::Record(vec![("a".into(), Type::Nat)]),
            Type::Sum {
                left: Box::new(Type::Nat),
                right: Box::new(Type::Bool),
            },
            Type::Variant(vec![("some".into(), Type::Nat)]),
            Type::Fun {
                params: vec![Type::Nat],
                result: Box::new(Type::Bool),
            },
        ];
        for ty in types {
            assert!(compare(Some(&ty), &ty, &span()).is_ok(), "{ty:?} not reflexive");
        }
    }

    #[test]
    fn lambda_where_nat_expected_reports_unexpected_lambda() {
        let fun = Type::Fun {
            params: vec![Type::Nat],
            result: Box::new(Type::Nat),
        };
        let err = compare(Some(&fun), &Type::Nat, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_LAMBDA");
    }

    #[test]
    fn record_field_type_mismatch_rewrites_to_unexpected_record_fields() {
        let expected = Type::Record(vec![("a".into(), Type::Nat)]);
        let actual = Type::Record(vec![("a".into(), Type::Bool)]);
        let err = compare(Some(&expected), &actual, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_RECORD_FIELDS");
    }

    #[test]
    fn record_with_fewer_fields_is_missing_fields() {
        let expected = Type::Record(vec![("a".into(), Type::Nat), ("b".into(), Type::Bool)]);
        let actual = Type::Record(vec![("a".into(), Type::Nat)]);
        let err = compare(Some(&expected), &actual, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_MISSING_RECORD_FIELDS");
    }

    #[test]
    fn tuple_arity_mismatch_is_unexpected_tuple_length() {
        let expected = Type::Tuple(vec![Type::Nat, Type::Bool]);
        let actual = Type::Tuple(vec![Type::Nat]);
        let err = compare(Some(&expected), &actual, &span()).unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_TUPLE_LENGTH");
    }
}
