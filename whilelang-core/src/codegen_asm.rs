//! Assembly backend for the toy accumulator machine.
//!
//! The machine has registers `A`, `B` and `C`, a push/pop stack, byte-sized
//! data cells declared with `DB`, and labelled jumps. Comparisons set flags
//! that the jump instructions read as unsigned.
//!
//! Output layout:
//!
//! ```text
//! JMP start
//! var_x: DB 0
//!
//! start:
//! ...
//! HLT
//! ```
//!
//! Only the loop dialect is supported: an `if` statement is rejected.

use crate::ast::{BinaryOp, Expr, Program, RelOp, RelationalExpr, Statement};
use crate::emitter::Emitter;
use crate::error::CoreError;
use crate::symbols::{Collect, Variables};

const BACKEND: &str = "assembly";

pub fn generate_asm(program: &Program) -> Result<String, CoreError> {
    let variables = Variables::collect(program, Collect::DeclarationsAndAssignments);
    let mut out = Emitter::new("");

    out.line("JMP start");
    for name in variables.names() {
        out.line(format!("{}: DB 0", cell(name)));
    }
    out.line("");
    out.line("start:");

    emit_block(&mut out, &program.body)?;

    out.line("HLT");
    Ok(out.finish())
}

fn cell(name: &str) -> String {
    format!("var_{name}")
}

fn emit_block(out: &mut Emitter, statements: &[Statement]) -> Result<(), CoreError> {
    for statement in statements {
        emit_statement(out, statement)?;
    }
    Ok(())
}

fn emit_statement(out: &mut Emitter, statement: &Statement) -> Result<(), CoreError> {
    match statement {
        Statement::VarDeclaration { name, value } => {
            emit_expr(out, value)?;
            out.line(format!("MOV [{}], A", cell(&name.name)));
        }
        Statement::Assignment { name, value } => {
            if is_saturating_decrement(&name.name, value) {
                emit_saturating_decrement(out, &name.name);
            } else {
                emit_expr(out, value)?;
                out.line(format!("MOV [{}], A", cell(&name.name)));
            }
        }
        Statement::While { condition, body } => {
            let start = format!("while_start_{}", out.next_label());
            let end = format!("while_end_{}", out.next_label());

            out.line(format!("{start}:"));
            emit_exit_test(out, condition, &end)?;
            emit_block(out, body)?;
            out.line(format!("JMP {start}"));
            out.line(format!("{end}:"));
        }
        Statement::If { .. } => {
            return Err(CoreError::UnsupportedStatement {
                backend: BACKEND,
                statement: statement.kind_name(),
            });
        }
    }
    Ok(())
}

/// `x = x - 1`, with the same name on both sides and a literal `1`.
fn is_saturating_decrement(target: &str, value: &Expr) -> bool {
    let Expr::BinaryExpr {
        operator: BinaryOp::Sub,
        left,
        right,
    } = value
    else {
        return false;
    };
    matches!(left.as_ref(), Expr::Identifier { name } if name == target)
        && matches!(right.as_ref(), Expr::NumberLiteral { value: 1 })
}

/// Decrement `name` unless it is already zero, so it never wraps below 0.
fn emit_saturating_decrement(out: &mut Emitter, name: &str) {
    let done = format!("dec_done_{name}_{}", out.next_label());
    let cell = cell(name);

    out.line(format!("; Saturated decrement for {name}: if ({name} > 0) {name}--"));
    out.line(format!("MOV A, [{cell}]"));
    out.line("CMP A, 0");
    out.line(format!("JE {done}"));
    out.line("DEC A");
    out.line(format!("MOV [{cell}], A"));
    out.line(format!("{done}:"));
}

/// Compare `left` against `right` and jump to `end` when the condition
/// does NOT hold.
fn emit_exit_test(out: &mut Emitter, condition: &RelationalExpr, end: &str) -> Result<(), CoreError> {
    emit_expr(out, &condition.left)?;
    out.line("MOV B, A");
    emit_expr(out, &condition.right)?;
    out.line("CMP B, A");
    out.line(format!("{} {end}", inverse_jump(condition.operator)));
    Ok(())
}

/// Jump taken when the relation fails, using the unsigned condition codes.
fn inverse_jump(operator: RelOp) -> &'static str {
    match operator {
        RelOp::Gt => "JBE",
        RelOp::Lt => "JAE",
        RelOp::Gte => "JB",
        RelOp::Lte => "JA",
        RelOp::Eq => "JNE",
        RelOp::Neq => "JE",
    }
}

/// Leaves the value of `expr` in `A`.
fn emit_expr(out: &mut Emitter, expr: &Expr) -> Result<(), CoreError> {
    match expr {
        Expr::NumberLiteral { value } => out.line(format!("MOV A, {value}")),
        Expr::Identifier { name } => out.line(format!("MOV A, [{}]", cell(name))),
        Expr::BinaryExpr {
            operator,
            left,
            right,
        } => {
            // Left is parked on the stack while right is computed, then
            // restored into B.
            emit_expr(out, left)?;
            out.line("PUSH A");
            emit_expr(out, right)?;
            out.line("POP B");
            match operator {
                BinaryOp::Add => out.line("ADD A, B"),
                BinaryOp::Sub => {
                    out.line("MOV C, B");
                    out.line("SUB C, A");
                    out.line("MOV A, C");
                }
                BinaryOp::Mul => {
                    out.line("MOV C, A");
                    out.line("MOV A, B");
                    out.line("MUL C");
                }
            }
        }
    }
    Ok(())
}
