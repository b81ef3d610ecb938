//! Integration tests driving the full lex → parse → check pipeline,
//! covering the testable properties and concrete scenarios a Stella
//! checker is expected to satisfy.

use stella_checker::lexer::Lexer;
use stella_checker::parser;
use stella_checker::typechecker::{TypeCheckError, TypeChecker};

fn run(src: &str) -> Result<(), TypeCheckError> {
    let tokens = Lexer::new(src).lex().expect("source should lex");
    let program = parser::parse(tokens).expect("source should parse");
    TypeChecker::new().check_program(&program)
}

#[test]
fn well_typed_successor_function_accepts() {
    assert!(run("fn main(x: Nat): Nat { return succ(x); }").is_ok());
}

#[test]
fn successor_against_bool_is_unexpected_type_for_expression() {
    let err = run("fn main(x: Nat): Bool { return succ(x); }").unwrap_err();
    assert_eq!(err.code(), "ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION");
}

#[test]
fn applying_a_nat_is_not_a_function() {
    let err = run("fn main(x: Nat): Nat { return x(x); }").unwrap_err();
    assert_eq!(err.code(), "ERROR_NOT_A_FUNCTION");
}

#[test]
fn function_value_returned_where_nat_expected() {
    let err = run("fn id(x: Nat): Nat { return x; } fn main(n: Nat): Nat { return id; }")
        .unwrap_err();
    assert_eq!(err.code(), "ERROR_UNEXPECTED_TYPE_FOR_EXPRESSION");
}

#[test]
fn list_literal_where_nat_expected_is_unexpected_list() {
    let err = run("fn main(n: Nat): Nat { return [1, 2, 3]; }").unwrap_err();
    assert_eq!(err.code(), "ERROR_UNEXPECTED_LIST");
}

#[test]
fn empty_and_cons_list_accept_against_list_of_nat() {
    assert!(run("fn main(n: Nat): [Nat] { return []; }").is_ok());
    assert!(run("fn main(n: Nat): [Nat] { return cons(0, []); }").is_ok());
}

#[test]
fn match_missing_an_arm_of_a_sum_is_nonexhaustive() {
    let err = run("fn main(x: Nat + Bool): Nat { return match x { inl(n) => n }; }")
        .unwrap_err();
    assert_eq!(err.code(), "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS");
}

#[test]
fn match_covering_both_sum_arms_accepts() {
    assert!(run(
        "fn main(x: Nat + Bool): Nat { return match x { inl(n) => n, inr(b) => 0 }; }"
    )
    .is_ok());
}

#[test]
fn accessing_an_undeclared_record_field_is_unexpected_field_access() {
    let err = run("fn main(x: Nat): Nat { return {a = 1, b = true}.c; }").unwrap_err();
    assert_eq!(err.code(), "ERROR_UNEXPECTED_FIELD_ACCESS");
}

#[test]
fn program_with_no_declarations_is_missing_main() {
    let err = run("").unwrap_err();
    assert_eq!(err.code(), "ERROR_MISSING_MAIN");
}

#[test]
fn program_without_main_is_missing_main() {
    let err = run("fn id(x: Nat): Nat { return x; }").unwrap_err();
    assert_eq!(err.code(), "ERROR_MISSING_MAIN");
}

#[test]
fn arity_mismatch_is_incorrect_number_of_arguments() {
    let err = run(
        "fn add(x: Nat, y: Nat): Nat { return x; } fn main(n: Nat): Nat { return add(n); }",
    )
    .unwrap_err();
    assert_eq!(err.code(), "ERROR_INCORRECT_NUMBER_OF_ARGUMENTS");
}

#[test]
fn tuple_index_zero_is_out_of_bounds() {
    let err = run("fn main(x: Nat): Nat { return {1, 2}.0; }").unwrap_err();
    assert_eq!(err.code(), "ERROR_TUPLE_INDEX_OUT_OF_BOUNDS");
}

#[test]
fn tuple_index_past_arity_is_out_of_bounds() {
    let err = run("fn main(x: Nat): Nat { return {1, 2}.3; }").unwrap_err();
    assert_eq!(err.code(), "ERROR_TUPLE_INDEX_OUT_OF_BOUNDS");
}

#[test]
fn nat_rec_implements_addition() {
    let src = "fn add(n: Nat, m: Nat): Nat { \
                   return Nat::rec(n, m, fn(p: Nat) { \
                       return fn(r: Nat) { return succ(r); }; \
                   }); \
               } \
               fn main(n: Nat): Nat { return add(n, n); }";
    assert!(run(src).is_ok());
}

#[test]
fn variant_match_must_cover_every_case() {
    let src = "fn main(x: <| some : Nat, none |>): Nat { \
                   return match x { <some = n> => n }; \
               }";
    let err = run(src).unwrap_err();
    assert_eq!(err.code(), "ERROR_NONEXHAUSTIVE_MATCH_PATTERNS");
}

#[test]
fn variant_match_covering_all_cases_accepts() {
    let src = "fn main(x: <| some : Nat, none |>): Nat { \
                   return match x { <some = n> => n, <none> => 0 }; \
               }";
    assert!(run(src).is_ok());
}

#[test]
fn unknown_variant_label_is_rejected() {
    let src = "fn main(x: <| some : Nat |>): <| some : Nat |> { return <other = 1>; }";
    let err = run(src).unwrap_err();
    assert_eq!(err.code(), "ERROR_UNEXPECTED_VARIANT_LABEL");
}

#[test]
fn bare_inl_without_expected_sum_type_is_ambiguous() {
    let src = "fn main(x: Nat): Nat { return (inl(1)).1; }";
    let err = run(src).unwrap_err();
    assert_eq!(err.code(), "ERROR_AMBIGUOUS_SUM_TYPE");
}

#[test]
fn ascription_reconciles_with_outer_expectation() {
    assert!(run("fn main(x: Nat): Nat { return x as Nat; }").is_ok());
}

#[test]
fn fix_requires_matching_parameter_and_result_type() {
    let src = "fn main(x: Nat): Nat { \
                   return fix(fn(self: fn(Nat) -> Nat) { \
                       return fn(n: Nat) { return n; }; \
                   })(x); \
               }";
    assert!(run(src).is_ok());
}

#[test]
fn let_binding_extends_scope_for_body_only() {
    let src = "fn main(x: Nat): Nat { return let y = succ(x) in y; }";
    assert!(run(src).is_ok());
}

#[test]
fn record_literal_round_trips_through_field_access() {
    let src = "fn main(x: Nat): Nat { return {a = x, b = true}.a; }";
    assert!(run(src).is_ok());
}

#[test]
fn forward_reference_between_mutually_recursive_functions_resolves() {
    let src = "fn isEven(n: Nat): Bool { return if isZero(n) then true else isOdd(pred(n)); } \
               fn isOdd(n: Nat): Bool { return if isZero(n) then false else isEven(pred(n)); } \
               fn main(n: Nat): Bool { return isEven(n); }";
    assert!(run(src).is_ok());
}
