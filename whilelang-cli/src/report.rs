//! Console rendering of tokens and trace entries.

use whilelang_core::interpreter::{Environment, TraceEntry, TraceEvent};
use whilelang_core::lexer::Token;

/// One line per trace entry, prefixed with the zero-padded step number.
pub fn format_trace(entry: &TraceEntry) -> String {
    let prefix = format!("[{:04}]", entry.step);
    match &entry.event {
        TraceEvent::VarDeclaration {
            name, after, expr, ..
        } => format!(
            "{prefix} var {name} = {expr}  (-> {after})  env={}",
            env_json(&entry.env)
        ),
        TraceEvent::Assignment {
            name,
            before,
            after,
            expr,
        } => format!(
            "{prefix} {name} = {expr}  ({before} -> {after})  env={}",
            env_json(&entry.env)
        ),
        TraceEvent::WhileTest { condition, result } => {
            format!("{prefix} while ({condition}) => {result}")
        }
        TraceEvent::IfTest { condition, result } => {
            format!("{prefix} if ({condition}) => {result}")
        }
    }
}

pub fn env_json(env: &Environment) -> String {
    serde_json::to_string(env).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_token(token: &Token) -> String {
    format!("{:>5}  {}", token.position, token.kind)
}
