//! Core of the whilelang toolchain.
//!
//! A tiny imperative language (integer variables, `+ - *`, one relational
//! test per condition, `while`, `if/else`) and everything that consumes it:
//!
//!   source text
//!     -> lexer          (tokens)
//!     -> parser         (AST)
//!     -> interpreter    (final environment + trace)
//!      | codegen_python (Python source)
//!      | codegen_wat    (WebAssembly text module)
//!      | codegen_asm    (toy accumulator-machine assembly)
//!
//! Every backend reads the same immutable AST and keeps its own state, so
//! they can run in any order or side by side. The CLI and anything else
//! that needs the pipeline should depend on this crate.

// ---------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Front-end: grammar, lexing, parsing
// ---------------------------------------------------------------------

pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod render;

// ---------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------

mod emitter;
pub mod symbols;
pub mod interpreter;
pub mod codegen_python;
pub mod codegen_wat;
pub mod codegen_asm;

// ---------------------------------------------------------------------
// Orchestration and artifact storage
// ---------------------------------------------------------------------

pub mod compiler;
pub mod workspace;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::Program;
pub use compiler::{
    FrontEnd, front_end, generate_assembly, interpret, parse_source, tokenize, transpile_python,
    transpile_wat,
};
pub use error::CoreError;
pub use grammar::Dialect;
pub use interpreter::{Execution, InterpreterOptions, TraceEntry, TraceEvent};
pub use workspace::{ArtifactKind, Workspace};
