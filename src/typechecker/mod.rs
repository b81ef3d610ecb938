//! # Typechecker
//!
//! The driver plus the components it composes: the semantic `Type`
//! representation, the lexical `TypeEnv`, the structural comparator, the
//! exhaustiveness analyzer, the bidirectional elaborator, and the closed
//! diagnostic taxonomy.

pub mod check;
pub mod compare;
pub mod env;
pub mod error;
pub mod exhaustive;
pub mod types;

use log::debug;

use crate::parser::ast::Program;

pub use error::{TypeCheckError, TypeResult};
pub use types::Type;

use env::TypeEnv;

#[derive(Default)]
pub struct TypeChecker;

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker
    }

    /// Seed the global scope with every declared function's signature
    /// before checking any body, so forward references and mutual
    /// recursion resolve.
    pub fn check_program(&self, program: &Program) -> TypeResult<()> {
        let mut global = TypeEnv::new();

        for decl in &program.decls {
            let fun_ty = Type::Fun {
                params: decl.params.iter().map(|p| Type::from(&p.ty)).collect(),
                result: Box::new(Type::from(&decl.return_type)),
            };
            global.insert(&decl.name, fun_ty);
        }
        debug!("global scope seeded with {} declarations", program.decls.len());

        if !program.decls.iter().any(|decl| decl.name == "main") {
            return Err(TypeCheckError::MissingMain);
        }

        for decl in &program.decls {
            let mut scope = global.nested();
            for param in &decl.params {
                scope.insert(&param.name, Type::from(&param.ty));
            }
            let return_ty = Type::from(&decl.return_type);
            check::check(&decl.body, &scope, Some(&return_ty))?;
            debug!("checked function '{}'", decl.name);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn check_source(src: &str) -> TypeResult<()> {
        let tokens = Lexer::new(src).lex().expect("should lex");
        let program = parse(tokens).expect("should parse");
        TypeChecker::new().check_program(&program)
    }

    #[test]
    fn program_without_main_is_rejected() {
        let err = check_source("fn id(x: Nat): Nat { return x; }").unwrap_err();
        assert_eq!(err.code(), "ERROR_MISSING_MAIN");
    }

    #[test]
    fn mutual_forward_reference_resolves() {
        assert!(check_source(
            "fn isEven(n: Nat): Bool { return if isZero(n) then true else isOdd(pred(n)); } \
             fn isOdd(n: Nat): Bool { return if isZero(n) then false else isEven(pred(n)); } \
             fn main(n: Nat): Bool { return isEven(n); }"
        )
        .is_ok());
    }

    #[test]
    fn arity_mismatch_is_incorrect_number_of_arguments() {
        let err = check_source(
            "fn add(x: Nat, y: Nat): Nat { return x; } fn main(n: Nat): Nat { return add(n); }",
        )
        .unwrap_err();
        assert_eq!(err.code(), "ERROR_INCORRECT_NUMBER_OF_ARGUMENTS");
    }
}
