//! Variable collection pre-pass used by the code generators.

use std::collections::HashSet;

use crate::ast::{Program, Statement};

/// Which statements introduce a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collect {
    /// Only `var` declarations.
    Declarations,
    /// Declarations and plain assignments.
    DeclarationsAndAssignments,
}

/// Variable names in order of first appearance, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl Variables {
    pub fn collect(program: &Program, mode: Collect) -> Self {
        let mut variables = Variables::default();
        variables.visit_block(&program.body, mode);
        variables
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    fn visit_block(&mut self, statements: &[Statement], mode: Collect) {
        for statement in statements {
            match statement {
                Statement::VarDeclaration { name, .. } => self.insert(&name.name),
                Statement::Assignment { name, .. } => {
                    if mode == Collect::DeclarationsAndAssignments {
                        self.insert(&name.name);
                    }
                }
                Statement::While { body, .. } => self.visit_block(body, mode),
                Statement::If {
                    consequent,
                    alternate,
                    ..
                } => {
                    self.visit_block(consequent, mode);
                    if let Some(alternate) = alternate {
                        self.visit_block(alternate, mode);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn collects_nested_declarations_in_order() {
        let program = parse(
            "var b = 1; while (b < 2) { var a = 0; } if (b > 0) { var c = 1; } else { var d = 2; } var b = 3;",
        )
        .expect("parse");
        let variables = Variables::collect(&program, Collect::Declarations);
        assert_eq!(variables.names(), ["b", "a", "c", "d"]);
    }

    #[test]
    fn assignments_count_only_when_requested() {
        let program = parse("x = 1; var y = 2;").expect("parse");
        let declared = Variables::collect(&program, Collect::Declarations);
        assert!(!declared.contains("x"));
        assert_eq!(declared.len(), 1);

        let all = Variables::collect(&program, Collect::DeclarationsAndAssignments);
        assert_eq!(all.names(), ["x", "y"]);
    }
}
