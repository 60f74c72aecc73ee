//! Recursive-descent parser.
//!
//! ```text
//! Program    := Statement*
//! Statement  := VarDecl | Assignment | While | If
//! VarDecl    := 'var' IDENT '=' ArithExpr ';'
//! Assignment := IDENT '=' ArithExpr ';'
//! While      := 'while' '(' BoolExpr ')' '{' Statement* '}'
//! If         := 'if' '(' BoolExpr ')' '{' Statement* '}' ('else' '{' Statement* '}')?
//! BoolExpr   := ArithExpr RelOp ArithExpr
//! ArithExpr  := Term (('+'|'-') Term)*
//! Term       := Factor ('*' Factor)*
//! Factor     := NUMBER | IDENT | '(' ArithExpr ')'
//! ```
//!
//! `If` exists only in [`Dialect::Full`]. There is no error recovery:
//! the first violation aborts the parse.

use crate::ast::{BinaryOp, Expr, Identifier, Program, RelOp, RelationalExpr, Statement};
use crate::error::CoreError;
use crate::grammar::Dialect;
use crate::lexer::{Token, TokenKind, lex_dialect};

/// Lex and parse `source` in the full dialect.
pub fn parse(source: &str) -> Result<Program, CoreError> {
    parse_dialect(source, Dialect::Full)
}

pub fn parse_dialect(source: &str, dialect: Dialect) -> Result<Program, CoreError> {
    let tokens = lex_dialect(source, dialect)?;
    parse_tokens(&tokens, dialect)
}

/// Parse an already lexed token stream. The stream must end with `Eof`.
pub fn parse_tokens(tokens: &[Token], dialect: Dialect) -> Result<Program, CoreError> {
    let mut parser = Parser {
        tokens,
        position: 0,
        dialect,
    };
    let body = parser.parse_statement_list()?;
    if !matches!(parser.current().kind, TokenKind::Eof) {
        return Err(parser.unexpected("statement or end of input"));
    }
    Ok(Program { body })
}

struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    dialect: Dialect,
}

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    position: 0,
};

impl<'t> Parser<'t> {
    fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), CoreError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> CoreError {
        let token = self.current();
        CoreError::Parse {
            position: token.position,
            expected: expected.to_string(),
            found: token.kind.to_string(),
        }
    }

    fn parse_statement_list(&mut self) -> Result<Vec<Statement>, CoreError> {
        let mut statements = Vec::new();
        while !matches!(self.current().kind, TokenKind::Eof | TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Statement, CoreError> {
        match &self.current().kind {
            TokenKind::Var => {
                self.advance();
                self.parse_var_declaration()
            }
            TokenKind::While => {
                self.advance();
                self.parse_while()
            }
            TokenKind::If if self.dialect.has_conditionals() => {
                self.advance();
                self.parse_if()
            }
            TokenKind::Ident(_) => self.parse_assignment(),
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_var_declaration(&mut self) -> Result<Statement, CoreError> {
        let name = self.parse_identifier()?;
        self.expect(&TokenKind::Assign, "'=' in variable declaration")?;
        let value = self.parse_arith_expr()?;
        self.expect(&TokenKind::Semi, "';' after variable declaration")?;
        Ok(Statement::VarDeclaration { name, value })
    }

    fn parse_assignment(&mut self) -> Result<Statement, CoreError> {
        let name = self.parse_identifier()?;
        self.expect(&TokenKind::Assign, "'=' in assignment")?;
        let value = self.parse_arith_expr()?;
        self.expect(&TokenKind::Semi, "';' after assignment")?;
        Ok(Statement::Assignment { name, value })
    }

    fn parse_while(&mut self) -> Result<Statement, CoreError> {
        let condition = self.parse_condition("while")?;
        let body = self.parse_block("loop")?;
        Ok(Statement::While { condition, body })
    }

    fn parse_if(&mut self) -> Result<Statement, CoreError> {
        let condition = self.parse_condition("if")?;
        let consequent = self.parse_block("if")?;
        let alternate = if self.eat(&TokenKind::Else) {
            Some(self.parse_block("else")?)
        } else {
            None
        };
        Ok(Statement::If {
            condition,
            consequent,
            alternate,
        })
    }

    /// `'(' BoolExpr ')'` following a `while` or `if` keyword.
    fn parse_condition(&mut self, keyword: &str) -> Result<RelationalExpr, CoreError> {
        self.expect(&TokenKind::LParen, &format!("'(' after '{keyword}'"))?;
        let condition = self.parse_bool_expr()?;
        self.expect(&TokenKind::RParen, "')' after condition")?;
        Ok(condition)
    }

    fn parse_block(&mut self, what: &str) -> Result<Vec<Statement>, CoreError> {
        self.expect(&TokenKind::LBrace, &format!("'{{' to open {what} block"))?;
        let statements = self.parse_statement_list()?;
        self.expect(&TokenKind::RBrace, &format!("'}}' to close {what} block"))?;
        Ok(statements)
    }

    fn parse_bool_expr(&mut self) -> Result<RelationalExpr, CoreError> {
        let left = self.parse_arith_expr()?;
        let operator = self.parse_rel_op()?;
        let right = self.parse_arith_expr()?;
        Ok(RelationalExpr {
            operator,
            left,
            right,
        })
    }

    fn parse_rel_op(&mut self) -> Result<RelOp, CoreError> {
        let operator = match self.current().kind {
            TokenKind::Gt => RelOp::Gt,
            TokenKind::Lt => RelOp::Lt,
            TokenKind::Gte => RelOp::Gte,
            TokenKind::Lte => RelOp::Lte,
            TokenKind::Eq => RelOp::Eq,
            TokenKind::Neq => RelOp::Neq,
            _ => return Err(self.unexpected("relational operator")),
        };
        self.advance();
        Ok(operator)
    }

    fn parse_arith_expr(&mut self) -> Result<Expr, CoreError> {
        let mut node = self.parse_term()?;
        loop {
            let operator = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(node),
            };
            self.advance();
            let right = self.parse_term()?;
            node = Expr::binary(operator, node, right);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, CoreError> {
        let mut node = self.parse_factor()?;
        while self.eat(&TokenKind::Star) {
            let right = self.parse_factor()?;
            node = Expr::binary(BinaryOp::Mul, node, right);
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> Result<Expr, CoreError> {
        match &self.current().kind {
            TokenKind::Number(value) => {
                let value = *value;
                self.advance();
                Ok(Expr::number(value))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expr::ident(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_arith_expr()?;
                self.expect(&TokenKind::RParen, "')' after expression")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("number, identifier or '('")),
        }
    }

    fn parse_identifier(&mut self) -> Result<Identifier, CoreError> {
        if let TokenKind::Ident(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            Ok(Identifier::new(name))
        } else {
            Err(self.unexpected("identifier"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_value(source: &str) -> Expr {
        let program = parse(source).expect("parse");
        match program.body.into_iter().next() {
            Some(Statement::VarDeclaration { value, .. }) => value,
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn parses_empty_program() {
        let program = parse("").expect("parse");
        assert!(program.body.is_empty());
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = first_value("var x = 2 - 3 - 4;");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Sub, Expr::number(2), Expr::number(3)),
                Expr::number(4),
            )
        );
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = first_value("var x = a + b * c;");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Add,
                Expr::ident("a"),
                Expr::binary(BinaryOp::Mul, Expr::ident("b"), Expr::ident("c")),
            )
        );
    }

    #[test]
    fn parentheses_reset_precedence() {
        let expr = first_value("var x = (a + b) * c;");
        assert_eq!(
            expr,
            Expr::binary(
                BinaryOp::Mul,
                Expr::binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("b")),
                Expr::ident("c"),
            )
        );
    }

    #[test]
    fn parses_while_loop() {
        let program = parse("var x = 0; while (x < 3) { x = x + 1; }").expect("parse");
        assert_eq!(program.body.len(), 2);
        let Statement::While { condition, body } = &program.body[1] else {
            panic!("expected while");
        };
        assert_eq!(condition.operator, RelOp::Lt);
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Statement::Assignment { .. }));
    }

    #[test]
    fn parses_if_with_and_without_else() {
        let program =
            parse("if (x == 1) { y = 2; } else { y = 3; } if (x != 1) { }").expect("parse");
        let Statement::If { alternate, .. } = &program.body[0] else {
            panic!("expected if");
        };
        assert_eq!(alternate.as_ref().map(Vec::len), Some(1));
        let Statement::If {
            consequent,
            alternate,
            ..
        } = &program.body[1]
        else {
            panic!("expected if");
        };
        assert!(consequent.is_empty());
        assert!(alternate.is_none());
    }

    #[test]
    fn loop_dialect_rejects_if() {
        let err = parse_dialect("if (x > 1) { }", Dialect::Loop).unwrap_err();
        // `if` is an identifier in the loop dialect, so it reads as an assignment.
        match err {
            CoreError::Parse {
                expected, found, ..
            } => {
                assert_eq!(expected, "'=' in assignment");
                assert_eq!(found, "LPAREN '('");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reports_missing_semicolon() {
        let err = parse("var x = 1").unwrap_err();
        match err {
            CoreError::Parse {
                position,
                expected,
                found,
            } => {
                assert_eq!(position, 9);
                assert_eq!(expected, "';' after variable declaration");
                assert_eq!(found, "EOF");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_chained_relations() {
        let err = parse("while (a < b < c) { }").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref expected, .. } if expected == "')' after condition"));
    }

    #[test]
    fn rejects_missing_relational_operator() {
        let err = parse("while (a) { }").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref expected, .. } if expected == "relational operator"));
    }

    #[test]
    fn rejects_unary_minus() {
        let err = parse("var x = -1;").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref found, .. } if found == "MINUS '-'"));
    }

    #[test]
    fn rejects_stray_closing_brace() {
        let err = parse("var x = 1; }").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref found, .. } if found == "RBRACE '}'"));
    }

    #[test]
    fn rejects_statement_starting_with_number() {
        let err = parse("5 = x;").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref expected, .. } if expected == "statement"));
    }

    #[test]
    fn unterminated_block_reports_eof() {
        let err = parse("while (x < 1) { x = x + 1;").unwrap_err();
        assert!(matches!(err, CoreError::Parse { ref found, .. } if found == "EOF"));
    }
}
