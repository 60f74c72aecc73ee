//! Grammar variants shared by the lexer and the parser.
//!
//! The toolchain ships two flavours of the language. The full one has
//! `if`/`else`; the loop-only one (consumed by the assembly backend) has
//! just `var` and `while`. Both are driven from this single definition
//! so the lexer and parser never drift apart.

/// Which optional productions are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Dialect {
    /// `var`, `while`, `if` and `else`.
    #[default]
    Full,
    /// `var` and `while` only. `if` and `else` are plain identifiers.
    Loop,
}

impl Dialect {
    /// Whether `if (...) { ... } else { ... }` is part of the grammar.
    pub fn has_conditionals(self) -> bool {
        matches!(self, Dialect::Full)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Full => "full",
            Dialect::Loop => "loop",
        }
    }
}
