//! # stellac
//!
//! The command-line entry point: reads a Stella source file, lexes,
//! parses, and type-checks it, printing the first diagnostic encountered
//! (if any) to standard output per the external contract.

mod cli;

use cli::*;

use std::{error::Error, fs, process::ExitCode};

use log::{debug, error, info};
use stella_checker::{lexer::Lexer, parser, typechecker::TypeChecker};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Cli::init();
    simple_logger::init_with_level((&args.verbosity).into())?;

    let source = fs::read_to_string(&args.file)?;
    debug!("read {} bytes from {:?}", source.len(), args.file);

    let tokens = match Lexer::new(&source).lex() {
        Ok(tokens) => tokens,
        Err(err) => {
            error!("{err}");
            return Ok(ExitCode::from(2));
        }
    };

    let program = match parser::parse(tokens) {
        Ok(program) => program,
        Err(err) => {
            error!("{err}");
            return Ok(ExitCode::from(2));
        }
    };

    if args.dump_ast {
        info!("Parsed AST:\n{:#?}", program);
    }

    match TypeChecker::new().check_program(&program) {
        Ok(()) => {
            debug!("program is well-typed");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{err}");
            Ok(ExitCode::from(1))
        }
    }
}
