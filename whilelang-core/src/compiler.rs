//! Source-to-artifact helpers that run the whole front end before a
//! single backend.

use crate::ast::Program;
use crate::codegen_asm::generate_asm;
use crate::codegen_python::generate_python;
use crate::codegen_wat::generate_wat;
use crate::error::CoreError;
use crate::grammar::Dialect;
use crate::interpreter::{Execution, InterpreterOptions, run};
use crate::lexer::{Token, lex_dialect};
use crate::parser::{parse_dialect, parse_tokens};

pub fn tokenize(source: &str, dialect: Dialect) -> Result<Vec<Token>, CoreError> {
    lex_dialect(source, dialect)
}

pub fn parse_source(source: &str, dialect: Dialect) -> Result<Program, CoreError> {
    parse_dialect(source, dialect)
}

pub fn interpret(source: &str, options: &InterpreterOptions) -> Result<Execution, CoreError> {
    let program = parse_source(source, Dialect::Full)?;
    run(&program, options)
}

pub fn transpile_python(source: &str) -> Result<String, CoreError> {
    generate_python(&parse_source(source, Dialect::Full)?)
}

pub fn transpile_wat(source: &str) -> Result<String, CoreError> {
    generate_wat(&parse_source(source, Dialect::Full)?)
}

/// The assembly toolchain reads the loop dialect.
pub fn generate_assembly(source: &str) -> Result<String, CoreError> {
    generate_asm(&parse_source(source, Dialect::Loop)?)
}

/// Tokens and tree of one source, kept together for callers that want to
/// print both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontEnd {
    pub tokens: Vec<Token>,
    pub program: Program,
}

pub fn front_end(source: &str, dialect: Dialect) -> Result<FrontEnd, CoreError> {
    let tokens = tokenize(source, dialect)?;
    let program = parse_tokens(&tokens, dialect)?;
    Ok(FrontEnd { tokens, program })
}
