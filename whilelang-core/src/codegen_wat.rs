//! WebAssembly text backend.
//!
//! The program becomes a single function inside a single module. Two
//! passes: declarations are collected first and emitted as `(local ...)`
//! entries, then each statement is lowered to stack instructions.
//!
//! `while` lowers to
//!
//! ```text
//! (block $exit_N
//!   (loop $loop_M
//!     <condition>
//!     i32.eqz
//!     br_if $exit_N
//!     <body>
//!     br $loop_M
//!   )
//! )
//! ```
//!
//! and `if` to a folded `(if (then ...) (else ...))` on the evaluated
//! condition.

use crate::ast::{BinaryOp, Expr, Program, RelOp, RelationalExpr, Statement};
use crate::emitter::{Emitter, Indent};
use crate::error::CoreError;
use crate::symbols::{Collect, Variables};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatOptions {
    pub indent: String,
    /// Function identifier without the leading `$`.
    pub function_name: String,
    /// Export name for the function, if it should be exported.
    pub export_name: Option<String>,
    /// Variable whose final value the function returns.
    pub result_local: Option<String>,
}

impl Default for WatOptions {
    fn default() -> Self {
        WatOptions {
            indent: "  ".to_string(),
            function_name: "_start".to_string(),
            export_name: Some("_start".to_string()),
            result_local: None,
        }
    }
}

impl WatOptions {
    /// Return the final value of `name` from the generated function.
    pub fn returning(mut self, name: impl Into<String>) -> Self {
        self.result_local = Some(name.into());
        self
    }
}

pub fn generate_wat(program: &Program) -> Result<String, CoreError> {
    generate_wat_with(program, &WatOptions::default())
}

pub fn generate_wat_with(program: &Program, options: &WatOptions) -> Result<String, CoreError> {
    let mut generator = WatGenerator {
        out: Emitter::new(options.indent.clone()),
        declared: Variables::collect(program, Collect::Declarations),
    };
    generator.emit_module(program, options)?;
    Ok(generator.out.finish())
}

struct WatGenerator {
    out: Emitter,
    declared: Variables,
}

impl Indent for WatGenerator {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.out
    }
}

impl WatGenerator {
    fn emit_module(&mut self, program: &Program, options: &WatOptions) -> Result<(), CoreError> {
        if let Some(name) = &options.result_local {
            self.require_declared(name)?;
        }

        let mut header = format!("(func ${}", options.function_name);
        if let Some(export) = &options.export_name {
            header.push_str(&format!(" (export \"{export}\")"));
        }
        if options.result_local.is_some() {
            header.push_str(" (result i32)");
        }

        self.out.line("(module");
        self.indented(|this| {
            this.out.line(&header);
            this.indented(|this| {
                for name in this.declared.names() {
                    this.out.line(format!("(local ${name} i32)"));
                }
                this.emit_block(&program.body)?;
                if let Some(name) = &options.result_local {
                    this.out.line(format!("local.get ${name}"));
                }
                Ok(())
            })?;
            this.out.line(")");
            Ok(())
        })?;
        self.out.line(")");
        Ok(())
    }

    fn require_declared(&self, name: &str) -> Result<(), CoreError> {
        if self.declared.contains(name) {
            Ok(())
        } else {
            Err(CoreError::undeclared(name))
        }
    }

    fn emit_block(&mut self, statements: &[Statement]) -> Result<(), CoreError> {
        for statement in statements {
            self.emit_statement(statement)?;
        }
        Ok(())
    }

    fn emit_statement(&mut self, statement: &Statement) -> Result<(), CoreError> {
        match statement {
            Statement::VarDeclaration { name, value } => {
                self.emit_expr(value)?;
                self.out.line(format!("local.set ${}", name.name));
            }
            Statement::Assignment { name, value } => {
                self.require_declared(&name.name)?;
                self.emit_expr(value)?;
                self.out.line(format!("local.set ${}", name.name));
            }
            Statement::While { condition, body } => {
                let exit_label = format!("$exit_{}", self.out.next_label());
                let loop_label = format!("$loop_{}", self.out.next_label());

                self.out.line(format!("(block {exit_label}"));
                self.indented(|this| {
                    this.out.line(format!("(loop {loop_label}"));
                    this.indented(|this| {
                        this.emit_condition(condition)?;
                        this.out.line("i32.eqz");
                        this.out.line(format!("br_if {exit_label}"));
                        this.emit_block(body)?;
                        this.out.line(format!("br {loop_label}"));
                        Ok(())
                    })?;
                    this.out.line(")");
                    Ok(())
                })?;
                self.out.line(")");
            }
            Statement::If {
                condition,
                consequent,
                alternate,
            } => {
                self.emit_condition(condition)?;
                self.out.line("(if");
                self.indented(|this| {
                    this.out.line("(then");
                    this.indented(|this| this.emit_block(consequent))?;
                    this.out.line(")");
                    if let Some(alternate) = alternate {
                        this.out.line("(else");
                        this.indented(|this| this.emit_block(alternate))?;
                        this.out.line(")");
                    }
                    Ok(())
                })?;
                self.out.line(")");
            }
        }
        Ok(())
    }

    fn emit_condition(&mut self, condition: &RelationalExpr) -> Result<(), CoreError> {
        self.emit_expr(&condition.left)?;
        self.emit_expr(&condition.right)?;
        self.out.line(compare_instruction(condition.operator));
        Ok(())
    }

    /// Post-order: left operand, right operand, operator.
    fn emit_expr(&mut self, expr: &Expr) -> Result<(), CoreError> {
        match expr {
            Expr::NumberLiteral { value } => self.out.line(format!("i32.const {value}")),
            Expr::Identifier { name } => {
                self.require_declared(name)?;
                self.out.line(format!("local.get ${name}"));
            }
            Expr::BinaryExpr {
                operator,
                left,
                right,
            } => {
                self.emit_expr(left)?;
                self.emit_expr(right)?;
                self.out.line(arith_instruction(*operator));
            }
        }
        Ok(())
    }
}

fn arith_instruction(operator: BinaryOp) -> &'static str {
    match operator {
        BinaryOp::Add => "i32.add",
        BinaryOp::Sub => "i32.sub",
        BinaryOp::Mul => "i32.mul",
    }
}

fn compare_instruction(operator: RelOp) -> &'static str {
    match operator {
        RelOp::Gt => "i32.gt_s",
        RelOp::Lt => "i32.lt_s",
        RelOp::Gte => "i32.ge_s",
        RelOp::Lte => "i32.le_s",
        RelOp::Eq => "i32.eq",
        RelOp::Neq => "i32.ne",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn wat(source: &str) -> String {
        generate_wat(&parse(source).expect("parse")).expect("generate")
    }

    #[test]
    fn lowers_counting_loop() {
        let expected = "\
(module
  (func $_start (export \"_start\")
    (local $x i32)
    i32.const 0
    local.set $x
    (block $exit_1
      (loop $loop_2
        local.get $x
        i32.const 3
        i32.lt_s
        i32.eqz
        br_if $exit_1
        local.get $x
        i32.const 1
        i32.add
        local.set $x
        br $loop_2
      )
    )
  )
)
";
        assert_eq!(wat("var x = 0; while (x < 3) { x = x + 1; }"), expected);
    }

    #[test]
    fn labels_are_unique_per_loop() {
        let text = wat("var i = 0; while (i < 2) { while (i > 5) { } i = i + 1; } while (i < 0) { }");
        for label in ["$exit_1", "$loop_2", "$exit_3", "$loop_4", "$exit_5", "$loop_6"] {
            assert_eq!(text.matches(&format!("(block {label}")).count() + text.matches(&format!("(loop {label}")).count(), 1, "{label}");
        }
    }

    #[test]
    fn lowers_if_else() {
        let text = wat("var x = 1; if (x != 0) { x = 2; } else { x = 3; }");
        let expected_tail = "\
    local.get $x
    i32.const 0
    i32.ne
    (if
      (then
        i32.const 2
        local.set $x
      )
      (else
        i32.const 3
        local.set $x
      )
    )
  )
)
";
        assert!(text.ends_with(expected_tail), "{text}");
    }

    #[test]
    fn omits_else_without_alternate() {
        let text = wat("var x = 1; if (x >= 0) { x = 2; }");
        assert!(!text.contains("(else"));
        assert!(text.contains("i32.ge_s"));
    }

    #[test]
    fn post_order_matches_tree_shape() {
        let text = wat("var a = 1; var b = a - (2 * a);");
        let body: Vec<_> = text.lines().map(str::trim).collect();
        let start = body.iter().position(|line| *line == "local.set $a").unwrap() + 1;
        assert_eq!(
            &body[start..start + 6],
            &["local.get $a", "i32.const 2", "local.get $a", "i32.mul", "i32.sub", "local.set $b"]
        );
    }

    #[test]
    fn declares_locals_before_code() {
        let text = wat("while (1 < 0) { var inner = 1; } var outer = 2;");
        let inner = text.find("(local $inner i32)").expect("inner local");
        let outer = text.find("(local $outer i32)").expect("outer local");
        let code = text.find("(block").expect("block");
        assert!(inner < outer && outer < code);
    }

    #[test]
    fn rejects_assignment_to_undeclared_name() {
        let err = generate_wat(&parse("x = 1;").expect("parse")).unwrap_err();
        assert!(matches!(err, CoreError::UndeclaredVariable { ref name } if name == "x"));
    }

    #[test]
    fn rejects_read_of_undeclared_name() {
        let err = generate_wat(&parse("var x = y;").expect("parse")).unwrap_err();
        assert!(matches!(err, CoreError::UndeclaredVariable { ref name } if name == "y"));
    }

    #[test]
    fn returns_requested_local() {
        let program = parse("var x = 4;").expect("parse");
        let options = WatOptions::default().returning("x");
        let text = generate_wat_with(&program, &options).expect("generate");
        assert!(text.contains("(func $_start (export \"_start\") (result i32)"));
        assert!(text.ends_with("    local.get $x\n  )\n)\n"));

        let missing = WatOptions::default().returning("nope");
        assert!(generate_wat_with(&program, &missing).is_err());
    }

    #[test]
    fn emits_largest_literal_unchanged() {
        let text = generate_wat(&parse("var x = 2147483647;").expect("parse")).expect("generate");
        assert!(text.contains("i32.const 2147483647
"));
    }

    #[test]
    fn generation_runs_are_independent() {
        let program = parse("while (1 > 2) { }").expect("parse");
        let first = generate_wat(&program).expect("first");
        let second = generate_wat(&program).expect("second");
        assert_eq!(first, second);
    }
}
