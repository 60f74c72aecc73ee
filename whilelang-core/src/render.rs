//! Source-like rendering of expressions with minimal parentheses.
//!
//! The interpreter trace and the Python backend both print through these
//! functions, so an expression reads the same in both places.

use std::fmt::{self, Write};

use crate::ast::{Expr, RelationalExpr};

/// Render `expr` with parentheses only where the tree needs them.
pub fn format_expr(expr: &Expr) -> String {
    expr.to_string()
}

/// Render `left op right` for a relational test.
pub fn format_condition(condition: &RelationalExpr) -> String {
    condition.to_string()
}

pub fn write_condition(out: &mut impl Write, condition: &RelationalExpr) -> fmt::Result {
    write_expr(out, &condition.left, 0)?;
    write!(out, " {} ", condition.operator.symbol())?;
    write_expr(out, &condition.right, 0)
}

/// A child is wrapped when it binds looser than its context. The right
/// operand's context is one level tighter, which keeps `a - (b - c)`
/// parenthesised while `(a - b) - c` prints bare.
pub fn write_expr(out: &mut impl Write, expr: &Expr, parent_precedence: u8) -> fmt::Result {
    match expr {
        Expr::NumberLiteral { value } => write!(out, "{value}"),
        Expr::Identifier { name } => out.write_str(name),
        Expr::BinaryExpr {
            operator,
            left,
            right,
        } => {
            let precedence = operator.precedence();
            let wrap = precedence < parent_precedence;
            if wrap {
                out.write_char('(')?;
            }
            write_expr(out, left, precedence)?;
            write!(out, " {} ", operator.symbol())?;
            write_expr(out, right, precedence + 1)?;
            if wrap {
                out.write_char(')')?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

impl fmt::Display for RelationalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_condition(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, RelOp};

    fn a() -> Expr {
        Expr::ident("a")
    }

    fn b() -> Expr {
        Expr::ident("b")
    }

    fn c() -> Expr {
        Expr::ident("c")
    }

    #[test]
    fn parenthesizes_looser_child() {
        let expr = Expr::binary(BinaryOp::Mul, Expr::binary(BinaryOp::Add, a(), b()), c());
        assert_eq!(format_expr(&expr), "(a + b) * c");
    }

    #[test]
    fn omits_parentheses_for_tighter_child() {
        let expr = Expr::binary(BinaryOp::Add, Expr::binary(BinaryOp::Mul, a(), b()), c());
        assert_eq!(format_expr(&expr), "a * b + c");
    }

    #[test]
    fn keeps_right_nested_subtraction() {
        let right_nested = Expr::binary(BinaryOp::Sub, a(), Expr::binary(BinaryOp::Sub, b(), c()));
        assert_eq!(format_expr(&right_nested), "a - (b - c)");
        let left_nested = Expr::binary(BinaryOp::Sub, Expr::binary(BinaryOp::Sub, a(), b()), c());
        assert_eq!(format_expr(&left_nested), "a - b - c");
    }

    #[test]
    fn formats_condition_and_display_agree() {
        let condition = RelationalExpr {
            operator: RelOp::Gte,
            left: Expr::binary(BinaryOp::Mul, Expr::binary(BinaryOp::Sub, a(), b()), Expr::number(2)),
            right: Expr::number(10),
        };
        assert_eq!(format_condition(&condition), "(a - b) * 2 >= 10");
        assert_eq!(condition.to_string(), format_condition(&condition));
    }

    #[test]
    fn renders_parsed_source_back() {
        let program = crate::parser::parse("var x = (1 + 2) * (3 - y) - 4 * z;").expect("parse");
        let crate::ast::Statement::VarDeclaration { value, .. } = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(value.to_string(), "(1 + 2) * (3 - y) - 4 * z");
    }
}
