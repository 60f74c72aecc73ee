use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("lex error at byte {position}: unexpected character '{character}'")]
    Lex { position: usize, character: char },
    #[error("lex error at byte {position}: integer literal {literal} does not fit in 32 bits")]
    NumberOutOfRange { position: usize, literal: String },
    #[error("parse error at byte {position}: expected {expected}, found {found}")]
    Parse {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("variable not declared: {name}")]
    UndeclaredVariable { name: String },
    #[error("{backend} backend does not support {statement} statements")]
    UnsupportedStatement {
        backend: &'static str,
        statement: &'static str,
    },
    #[error("step limit exceeded ({max_steps}); possible infinite loop")]
    StepLimitExceeded { max_steps: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize artifact: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn undeclared(name: &str) -> Self {
        CoreError::UndeclaredVariable {
            name: name.to_string(),
        }
    }
}
