//! Python backend.
//!
//! One output line per statement. Block bodies are indented one level and
//! an empty body becomes `pass`. Expressions go through [`crate::render`],
//! so they read exactly like the interpreter trace.

use crate::ast::{Program, Statement};
use crate::emitter::{Emitter, Indent};
use crate::error::CoreError;
use crate::render::{format_condition, format_expr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonOptions {
    pub indent: String,
}

impl Default for PythonOptions {
    fn default() -> Self {
        PythonOptions {
            indent: "    ".to_string(),
        }
    }
}

pub fn generate_python(program: &Program) -> Result<String, CoreError> {
    generate_python_with(program, &PythonOptions::default())
}

pub fn generate_python_with(program: &Program, options: &PythonOptions) -> Result<String, CoreError> {
    let mut out = Emitter::new(options.indent.clone());
    emit_block(&mut out, &program.body)?;
    Ok(out.finish())
}

fn emit_block(out: &mut Emitter, statements: &[Statement]) -> Result<(), CoreError> {
    if statements.is_empty() {
        out.line("pass");
        return Ok(());
    }
    for statement in statements {
        emit_statement(out, statement)?;
    }
    Ok(())
}

fn emit_statement(out: &mut Emitter, statement: &Statement) -> Result<(), CoreError> {
    match statement {
        Statement::VarDeclaration { name, value } | Statement::Assignment { name, value } => {
            out.line(format!("{} = {}", name.name, format_expr(value)));
        }
        Statement::While { condition, body } => {
            out.line(format!("while {}:", format_condition(condition)));
            out.indented(|out| emit_block(out, body))?;
        }
        Statement::If {
            condition,
            consequent,
            alternate,
        } => {
            out.line(format!("if {}:", format_condition(condition)));
            out.indented(|out| emit_block(out, consequent))?;
            if let Some(alternate) = alternate {
                out.line("else:");
                out.indented(|out| emit_block(out, alternate))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn python(source: &str) -> String {
        generate_python(&parse(source).expect("parse")).expect("generate")
    }

    #[test]
    fn transpiles_counting_loop() {
        assert_eq!(
            python("var x = 0; while (x < 3) { x = x + 1; }"),
            "x = 0\nwhile x < 3:\n    x = x + 1\n"
        );
    }

    #[test]
    fn empty_program_is_pass() {
        assert_eq!(python(""), "pass\n");
    }

    #[test]
    fn empty_bodies_become_pass() {
        assert_eq!(
            python("while (x > 0) { } if (x == 0) { } else { }"),
            "while x > 0:\n    pass\nif x == 0:\n    pass\nelse:\n    pass\n"
        );
    }

    #[test]
    fn else_only_when_present() {
        assert_eq!(
            python("if (a != b) { a = b; }"),
            "if a != b:\n    a = b\n"
        );
    }

    #[test]
    fn nests_indentation() {
        let source = "var i = 0; while (i < 2) { if (i == 1) { var j = (i + 1) * 2; } else { i = i; } i = i + 1; }";
        let expected = "\
i = 0
while i < 2:
    if i == 1:
        j = (i + 1) * 2
    else:
        i = i
    i = i + 1
";
        assert_eq!(python(source), expected);
    }

    #[test]
    fn honours_custom_indent() {
        let program = parse("while (x > 0) { x = x - 1; }").expect("parse");
        let options = PythonOptions {
            indent: "\t".to_string(),
        };
        assert_eq!(
            generate_python_with(&program, &options).expect("generate"),
            "while x > 0:\n\tx = x - 1\n"
        );
    }
}
