//! Abstract syntax tree shared by every backend.
//!
//! The parser is the only producer. Nodes serialise as
//! `{"type": "<Kind>", ...}` so that saved AST artifacts can be read
//! back into an identical tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Program")]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VarDeclaration {
        name: Identifier,
        value: Expr,
    },
    Assignment {
        name: Identifier,
        value: Expr,
    },
    While {
        condition: RelationalExpr,
        body: Vec<Statement>,
    },
    If {
        condition: RelationalExpr,
        consequent: Vec<Statement>,
        alternate: Option<Vec<Statement>>,
    },
}

impl Statement {
    /// Node kind as it appears in serialised output and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::VarDeclaration { .. } => "VarDeclaration",
            Statement::Assignment { .. } => "Assignment",
            Statement::While { .. } => "While",
            Statement::If { .. } => "If",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalExpr {
    pub operator: RelOp,
    pub left: Expr,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    BinaryExpr {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    NumberLiteral {
        value: i32,
    },
    Identifier {
        name: String,
    },
}

impl Expr {
    pub fn number(value: i32) -> Self {
        Expr::NumberLiteral { value }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    pub fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Binding strength used by both the parser and the printers.
    /// Leaves bind tighter than any operator.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryExpr { operator, .. } => operator.precedence(),
            Expr::NumberLiteral { .. } | Expr::Identifier { .. } => ATOM_PRECEDENCE,
        }
    }
}

pub const ATOM_PRECEDENCE: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul => 2,
            BinaryOp::Add | BinaryOp::Sub => 1,
        }
    }

    /// Values are 32-bit and wrap on overflow, the same as `i32.add` and
    /// friends in the WebAssembly output.
    pub fn apply(self, left: i32, right: i32) -> i32 {
        match self {
            BinaryOp::Add => left.wrapping_add(right),
            BinaryOp::Sub => left.wrapping_sub(right),
            BinaryOp::Mul => left.wrapping_mul(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
}

impl RelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Gt => ">",
            RelOp::Lt => "<",
            RelOp::Gte => ">=",
            RelOp::Lte => "<=",
            RelOp::Eq => "==",
            RelOp::Neq => "!=",
        }
    }

    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            RelOp::Gt => left > right,
            RelOp::Lt => left < right,
            RelOp::Gte => left >= right,
            RelOp::Lte => left <= right,
            RelOp::Eq => left == right,
            RelOp::Neq => left != right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tags() {
        let program = Program {
            body: vec![Statement::VarDeclaration {
                name: Identifier::new("x"),
                value: Expr::binary(BinaryOp::Add, Expr::number(1), Expr::ident("y")),
            }],
        };
        let json = serde_json::to_value(&program).expect("serialize");
        assert_eq!(json["type"], "Program");
        assert_eq!(json["body"][0]["type"], "VarDeclaration");
        assert_eq!(json["body"][0]["name"]["type"], "Identifier");
        assert_eq!(json["body"][0]["name"]["name"], "x");
        assert_eq!(json["body"][0]["value"]["operator"], "+");
        assert_eq!(json["body"][0]["value"]["right"]["type"], "Identifier");
    }

    #[test]
    fn missing_alternate_serializes_as_null() {
        let stmt = Statement::If {
            condition: RelationalExpr {
                operator: RelOp::Neq,
                left: Expr::ident("x"),
                right: Expr::number(0),
            },
            consequent: Vec::new(),
            alternate: None,
        };
        let json = serde_json::to_value(&stmt).expect("serialize");
        assert!(json["alternate"].is_null());
        assert_eq!(json["condition"]["operator"], "!=");
    }

    #[test]
    fn identifier_round_trips_with_tag() {
        let json = r#"{"type":"Assignment","name":{"type":"Identifier","name":"n"},"value":{"type":"NumberLiteral","value":3}}"#;
        let stmt: Statement = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            stmt,
            Statement::Assignment {
                name: Identifier::new("n"),
                value: Expr::number(3),
            }
        );
        assert_eq!(serde_json::to_string(&stmt).expect("serialize"), json);
    }

    #[test]
    fn arithmetic_wraps_at_32_bits() {
        assert_eq!(BinaryOp::Mul.apply(100_000, 100_000), 1_410_065_408);
        assert_eq!(BinaryOp::Add.apply(i32::MAX, 1), i32::MIN);
        assert_eq!(BinaryOp::Sub.apply(i32::MIN, 1), i32::MAX);
    }

    #[test]
    fn relational_operators_compare_signed_values() {
        assert!(RelOp::Lt.holds(-1, 0));
        assert!(RelOp::Gte.holds(3, 3));
        assert!(!RelOp::Neq.holds(4, 4));
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert_eq!(BinaryOp::Add.precedence(), BinaryOp::Sub.precedence());
        assert!(Expr::number(1).precedence() > BinaryOp::Mul.precedence());
    }
}
