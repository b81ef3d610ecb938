//! The bidirectional elaborator. `check` threads an optional expected type
//! through every expression form: present, it is both propagated into
//! subexpressions and reconciled against the synthesized type via the
//! comparator; absent, the expression is synthesized and handed back
//! as-is (raising a diagnostic if the form is inherently ambiguous
//! without context).

use crate::lexer::Span;
use crate::parser::ast::{Expr, Pattern};

use super::compare::compare;
use super::env::TypeEnv;
use super::error::{describe_type, TypeCheckError, TypeResult};
use super::exhaustive::check_exhaustive;
use super::types::Type;

pub fn check(expr: &Expr, env: &TypeEnv, expected: Option<&Type>) -> TypeResult<Type> {
    let actual = infer(expr, env, expected)?;
    compare(expected, &actual, &expr.span())?;
    Ok(actual)
}

fn synthesize(expr: &Expr, env: &TypeEnv) -> TypeResult<Type> {
    check(expr, env, None)
}

fn infer(expr: &Expr, env: &TypeEnv, expected: Option<&Type>) -> TypeResult<Type> {
    match expr {
        Expr::Bool(_, _) => Ok(Type::Bool),
        Expr::Nat(_, _) => Ok(Type::Nat),
        Expr::Unit(_) => Ok(Type::Unit),

        Expr::Var(name, span) => env
            .lookup(name)
            .cloned()
            .ok_or_else(|| TypeCheckError::UndefinedVariable {
                name: name.clone(),
                span: span.clone(),
            }),

        Expr::Succ(inner, _) | Expr::Pred(inner, _) => {
            check(inner, env, Some(&Type::Nat))?;
            Ok(Type::Nat)
        }

        Expr::IsZero(inner, _) => {
            check(inner, env, Some(&Type::Nat))?;
            Ok(Type::Bool)
        }

        Expr::NatRec(n, z, s, _) => {
            check(n, env, Some(&Type::Nat))?;
            let result_ty = check(z, env, expected)?;
            let step_ty = Type::Fun {
                params: vec![Type::Nat],
                result: Box::new(Type::Fun {
                    params: vec![result_ty.clone()],
                    result: Box::new(result_ty.clone()),
                }),
            };
            check(s, env, Some(&step_ty))?;
            Ok(result_ty)
        }

        Expr::If(cond, then_branch, else_branch, span) => {
            check(cond, env, Some(&Type::Bool))?;
            match expected {
                Some(exp) => {
                    check(then_branch, env, Some(exp))?;
                    check(else_branch, env, Some(exp))?;
                    Ok(exp.clone())
                }
                None => {
                    let then_ty = synthesize(then_branch, env)?;
                    let else_ty = synthesize(else_branch, env)?;
                    compare(Some(&then_ty), &else_ty, span)?;
                    Ok(then_ty)
                }
            }
        }

        Expr::Abstraction(params, body, span) => {
            if let Some(exp) = expected {
                if !matches!(exp, Type::Fun { .. }) {
                    return Err(TypeCheckError::UnexpectedLambda {
                        expected: describe_type(exp),
                        span: span.clone(),
                    });
                }
            }

            let param_types: Vec<Type> = params.iter().map(|p| Type::from(&p.ty)).collect();
            let mut scope = env.nested();
            for (param, ty) in params.iter().zip(param_types.iter()) {
                scope.insert(&param.name, ty.clone());
            }

            let body_ty = synthesize(body, &scope)?;
            if let Some(Type::Fun { result, .. }) = expected {
                compare(Some(result.as_ref()), &body_ty, &body.span())?;
            }

            Ok(Type::Fun {
                params: param_types,
                result: Box::new(body_ty),
            })
        }

        Expr::Application(fun, args, span) => {
            let fun_ty = synthesize(fun, env)?;
            let Type::Fun { params, result } = &fun_ty else {
                return Err(TypeCheckError::NotAFunction { span: span.clone() });
            };
            if params.len() != args.len() {
                return Err(TypeCheckError::IncorrectNumberOfArguments {
                    expected: params.len(),
                    actual: args.len(),
                    span: span.clone(),
                });
            }
            for (arg, param_ty) in args.iter().zip(params.iter()) {
                check(arg, env, Some(param_ty))?;
            }
            Ok(result.as_ref().clone())
        }

        Expr::Seq(inner, _) => check(inner, env, expected),

        Expr::Let(name, rhs, body, _) => {
            let rhs_ty = synthesize(rhs, env)?;
            let mut scope = env.nested();
            scope.insert(name, rhs_ty);
            check(body, &scope, expected)
        }

        Expr::List(items, span) => match expected {
            None => Err(TypeCheckError::AmbiguousList { span: span.clone() }),
            Some(Type::List(elem)) => {
                for item in items {
                    check(item, env, Some(elem.as_ref()))?;
                }
                Ok(Type::List(elem.clone()))
            }
            Some(other) => Err(TypeCheckError::UnexpectedList {
                expected: describe_type(other),
                span: span.clone(),
            }),
        },

        Expr::Cons(head, tail, span) => match expected {
            None => Err(TypeCheckError::AmbiguousList { span: span.clone() }),
            Some(exp @ Type::List(elem)) => {
                check(tail, env, Some(exp))?;
                check(head, env, Some(elem.as_ref()))?;
                Ok(exp.clone())
            }
            Some(other) => Err(TypeCheckError::UnexpectedList {
                expected: describe_type(other),
                span: span.clone(),
            }),
        },

        Expr::Head(list, span) => match synthesize(list, env)? {
            Type::List(elem) => Ok(*elem),
            _ => Err(TypeCheckError::NotAList { span: span.clone() }),
        },

        Expr::Tail(list, span) => match synthesize(list, env)? {
            ty @ Type::List(_) => Ok(ty),
            _ => Err(TypeCheckError::NotAList { span: span.clone() }),
        },

        Expr::IsEmpty(list, span) => match synthesize(list, env)? {
            Type::List(_) => Ok(Type::Bool),
            _ => Err(TypeCheckError::NotAList { span: span.clone() }),
        },

        // Field-wise expected types are not propagated into record literal
        // members; each field is synthesized independently and the whole
        // record is reconciled against `expected` by the caller's compare.
        Expr::Record(fields, _) => {
            let mut out = Vec::with_capacity(fields.len());
            for (label, value) in fields {
                out.push((label.clone(), synthesize(value, env)?));
            }
            Ok(Type::Record(out))
        }

        Expr::DotRecord(record, label, span) => match synthesize(record, env)? {
            Type::Record(fields) => fields
                .into_iter()
                .find(|(name, _)| name == label)
                .map(|(_, ty)| ty)
                .ok_or_else(|| TypeCheckError::UnexpectedFieldAccess {
                    label: label.clone(),
                    span: span.clone(),
                }),
            _ => Err(TypeCheckError::NotARecord { span: span.clone() }),
        },

        Expr::Tuple(items, _) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(synthesize(item, env)?);
            }
            Ok(Type::Tuple(out))
        }

        Expr::DotTuple(tuple, index, span) => match synthesize(tuple, env)? {
            Type::Tuple(items) => {
                if *index < 1 || *index as usize > items.len() {
                    return Err(TypeCheckError::TupleIndexOutOfBounds { span: span.clone() });
                }
                Ok(items[*index as usize - 1].clone())
            }
            other => Err(TypeCheckError::UnexpectedTypeForExpression {
                expected: "a tuple type".to_string(),
                actual: describe_type(&other),
                span: span.clone(),
            }),
        },

        Expr::TypeAscription(inner, type_name, _) => {
            let ty = Type::from(type_name);
            check(inner, env, Some(&ty))?;
            Ok(ty)
        }

        Expr::Inl(inner, span) => match expected {
            None => Err(TypeCheckError::AmbiguousSumType { span: span.clone() }),
            Some(exp @ Type::Sum { left, .. }) => {
                check(inner, env, Some(left.as_ref()))?;
                Ok(exp.clone())
            }
            Some(other) => Err(TypeCheckError::UnexpectedInjection {
                expected: describe_type(other),
                span: span.clone(),
            }),
        },

        Expr::Inr(inner, span) => match expected {
            None => Err(TypeCheckError::AmbiguousSumType { span: span.clone() }),
            Some(exp @ Type::Sum { right, .. }) => {
                check(inner, env, Some(right.as_ref()))?;
                Ok(exp.clone())
            }
            Some(other) => Err(TypeCheckError::UnexpectedInjection {
                expected: describe_type(other),
                span: span.clone(),
            }),
        },

        Expr::Variant(label, payload, span) => match expected {
            None => Err(TypeCheckError::AmbiguousVariantType { span: span.clone() }),
            Some(exp @ Type::Variant(cases)) => {
                let Some(case_ty) = cases.iter().find(|(name, _)| name == label).map(|(_, t)| t)
                else {
                    return Err(TypeCheckError::UnexpectedVariantLabel {
                        label: label.clone(),
                        span: span.clone(),
                    });
                };
                match payload {
                    Some(value) => {
                        check(value, env, Some(case_ty))?;
                    }
                    None => compare(Some(case_ty), &Type::Unit, span)?,
                }
                Ok(exp.clone())
            }
            Some(other) => Err(TypeCheckError::UnexpectedVariant {
                expected: describe_type(other),
                span: span.clone(),
            }),
        },

        Expr::Match(scrutinee, cases, span) => {
            let scrutinee_ty = synthesize(scrutinee, env)?;
            if cases.is_empty() {
                return Err(TypeCheckError::IllegalEmptyMatching { span: span.clone() });
            }
            let binder_types = check_exhaustive(&scrutinee_ty, cases, span)?;

            match expected {
                Some(exp) => {
                    for (case, binder_ty) in cases.iter().zip(binder_types.iter()) {
                        let case_scope = bind_pattern(env, &case.pattern, binder_ty);
                        check(&case.body, &case_scope, Some(exp))?;
                    }
                    Ok(exp.clone())
                }
                None => {
                    let mut result_ty: Option<Type> = None;
                    for (case, binder_ty) in cases.iter().zip(binder_types.iter()) {
                        let case_scope = bind_pattern(env, &case.pattern, binder_ty);
                        let case_ty = synthesize(&case.body, &case_scope)?;
                        match &result_ty {
                            None => result_ty = Some(case_ty),
                            Some(expected_case_ty) => {
                                compare(Some(expected_case_ty), &case_ty, &case.body.span())?;
                            }
                        }
                    }
                    Ok(result_ty.expect("non-empty match has at least one case"))
                }
            }
        }

        Expr::Fix(inner, span) => match synthesize(inner, env)? {
            Type::Fun { params, result } if params.len() == 1 => {
                compare(Some(&params[0]), result.as_ref(), span)?;
                Ok(*result)
            }
            _ => Err(TypeCheckError::NotAFunction { span: span.clone() }),
        },
    }
}

fn bind_pattern(env: &TypeEnv, pattern: &Pattern, binder_ty: &Type) -> TypeEnv {
    let mut scope = env.nested();
    let binder_name = match pattern {
        Pattern::Inl(name, _) | Pattern::Inr(name, _) => Some(name.as_str()),
        Pattern::Variant(_, binder, _) => binder.as_deref(),
    };
    if let Some(name) = binder_name {
        scope.insert(name, binder_ty.clone());
    }
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn check_source(src: &str) -> TypeResult<()> {
        let tokens = Lexer::new(src).lex().expect("should lex");
        let program = parse(tokens).expect("should parse");
        crate::typechecker::TypeChecker::new().check_program(&program)
    }

    #[test]
    fn accepts_succ_against_nat() {
        assert!(check_source("fn main(x: Nat): Nat { return succ(x); }").is_ok());
    }

    #[test]
    fn rejects_succ_against_bool() {
        let err = check_source("fn main(x: Nat): Bool { return succ(x); }").unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION");
    }

    #[test]
    fn rejects_application_of_non_function() {
        let err = check_source("fn main(x: Nat): Nat { return x(x); }").unwrap_err();
        assert_eq!(err.code(), "ERROR_NOT_A_FUNCTION");
    }

    #[test]
    fn rejects_function_value_where_nat_expected() {
        let err = check_source(
            "fn id(x: Nat): Nat { return x; } fn main(n: Nat): Nat { return id; }",
        )
        .unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION");
    }

    #[test]
    fn rejects_list_literal_where_nat_expected() {
        let err = check_source("fn main(n: Nat): Nat { return [1, 2, 3]; }").unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_LIST");
    }

    #[test]
    fn accepts_empty_and_cons_list_against_list_nat() {
        assert!(check_source("fn main(n: Nat): [Nat] { return []; }").is_ok());
        assert!(check_source("fn main(n: Nat): [Nat] { return cons(0, []); }").is_ok());
    }

    #[test]
    fn nonexhaustive_sum_match_is_rejected() {
        let err = check_source(
            "fn main(x: Nat + Bool): Nat { return match x { inl(n) => n }; }",
        )
        .unwrap_err();
        assert_eq!(err.code(), "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS");
    }

    #[test]
    fn unknown_record_field_is_rejected() {
        let err = check_source(
            "fn main(x: Nat): Nat { return {a = 1, b = true}.c; }",
        )
        .unwrap_err();
        assert_eq!(err.code(), "ERROR_UNEXPECTED_FIELD_ACCESS");
    }

    #[test]
    fn tuple_index_out_of_bounds_is_rejected() {
        let err = check_source("fn main(x: Nat): Nat { return {1, 2}.3; }").unwrap_err();
        assert_eq!(err.code(), "ERROR_TUPLE_INDEX_OUT_OF_BOUNDS");
    }

    #[test]
    fn round_trip_identity_application_accepts() {
        assert!(check_source(
            "fn main(v: Nat): Nat { return (fn(x: Nat) { return x; })(v); }"
        )
        .is_ok());
    }

    #[test]
    fn fix_of_an_identity_shaped_function_round_trips() -> anyhow::Result<()> {
        check_source(
            "fn main(x: Nat): Nat { \
                 return fix(fn(self: fn(Nat) -> Nat) { return fn(n: Nat) { return n; }; })(x); \
             }",
        )?;
        Ok(())
    }
}
