//! Step-bounded tree-walking interpreter.
//!
//! Every observable action (a declaration, an assignment, a loop or
//! branch test) becomes one [`TraceEntry`]. Each entry costs one step, and
//! the run aborts with [`CoreError::StepLimitExceeded`] once the count
//! goes past [`InterpreterOptions::max_steps`]. That limit is the only
//! guard against a `while` loop that never ends.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ast::{Expr, Program, RelationalExpr, Statement};
use crate::error::CoreError;
use crate::render::{format_condition, format_expr};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    pub max_steps: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        InterpreterOptions {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl InterpreterOptions {
    pub fn with_max_steps(max_steps: usize) -> Result<Self, CoreError> {
        if max_steps == 0 {
            return Err(CoreError::InvalidArgument(
                "step limit must be positive".to_string(),
            ));
        }
        Ok(InterpreterOptions { max_steps })
    }
}

/// Parse a user-supplied step limit.
///
/// Any finite positive number is accepted; a fractional part is dropped.
pub fn parse_step_limit(text: &str) -> Result<usize, CoreError> {
    let invalid = || CoreError::InvalidArgument(format!("invalid step limit: {text}"));
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 1.0 {
        return Err(invalid());
    }
    if value >= usize::MAX as f64 {
        return Ok(usize::MAX);
    }
    Ok(value as usize)
}

/// Variable bindings of one run. Snapshots are ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    values: BTreeMap<String, i32>,
}

impl Environment {
    pub fn get(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }

    /// Bind `name` and return the value it had before, if any.
    pub fn set(&mut self, name: &str, value: i32) -> Option<i32> {
        self.values.insert(name.to_string(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum TraceEvent {
    VarDeclaration {
        name: String,
        before: Option<i32>,
        after: i32,
        expr: String,
    },
    Assignment {
        name: String,
        before: i32,
        after: i32,
        expr: String,
    },
    WhileTest {
        condition: String,
        result: bool,
    },
    IfTest {
        condition: String,
        result: bool,
    },
}

impl TraceEvent {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TraceEvent::VarDeclaration { .. } => "VarDeclaration",
            TraceEvent::Assignment { .. } => "Assignment",
            TraceEvent::WhileTest { .. } => "WhileTest",
            TraceEvent::IfTest { .. } => "IfTest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// 1-based, strictly increasing.
    pub step: usize,
    #[serde(flatten)]
    pub event: TraceEvent,
    /// Bindings right after the action.
    pub env: Environment,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub env: Environment,
    pub trace: Vec<TraceEntry>,
}

pub fn run(program: &Program, options: &InterpreterOptions) -> Result<Execution, CoreError> {
    run_observed(program, options, |_| {})
}

/// Like [`run`], but hands every trace entry to `observer` as soon as it
/// is recorded.
pub fn run_observed(
    program: &Program,
    options: &InterpreterOptions,
    observer: impl FnMut(&TraceEntry),
) -> Result<Execution, CoreError> {
    let mut machine = Machine {
        max_steps: options.max_steps,
        env: Environment::default(),
        step: 0,
        trace: Vec::new(),
        observer,
    };
    machine.exec_block(&program.body)?;
    Ok(Execution {
        env: machine.env,
        trace: machine.trace,
    })
}

/// Per-run state. A fresh machine is built for every call to `run`.
struct Machine<F> {
    max_steps: usize,
    env: Environment,
    step: usize,
    trace: Vec<TraceEntry>,
    observer: F,
}

impl<F: FnMut(&TraceEntry)> Machine<F> {
    fn emit(&mut self, event: TraceEvent) -> Result<(), CoreError> {
        self.step += 1;
        if self.step > self.max_steps {
            return Err(CoreError::StepLimitExceeded {
                max_steps: self.max_steps,
            });
        }
        let entry = TraceEntry {
            step: self.step,
            event,
            env: self.env.clone(),
        };
        (self.observer)(&entry);
        self.trace.push(entry);
        Ok(())
    }

    fn exec_block(&mut self, statements: &[Statement]) -> Result<(), CoreError> {
        for statement in statements {
            self.exec_statement(statement)?;
        }
        Ok(())
    }

    fn exec_statement(&mut self, statement: &Statement) -> Result<(), CoreError> {
        match statement {
            Statement::VarDeclaration { name, value } => {
                let after = self.eval_expr(value)?;
                let before = self.env.set(&name.name, after);
                self.emit(TraceEvent::VarDeclaration {
                    name: name.name.clone(),
                    before,
                    after,
                    expr: format_expr(value),
                })
            }
            Statement::Assignment { name, value } => {
                let before = self
                    .env
                    .get(&name.name)
                    .ok_or_else(|| CoreError::undeclared(&name.name))?;
                let after = self.eval_expr(value)?;
                self.env.set(&name.name, after);
                self.emit(TraceEvent::Assignment {
                    name: name.name.clone(),
                    before,
                    after,
                    expr: format_expr(value),
                })
            }
            Statement::While { condition, body } => loop {
                let result = self.eval_condition(condition)?;
                self.emit(TraceEvent::WhileTest {
                    condition: format_condition(condition),
                    result,
                })?;
                if !result {
                    return Ok(());
                }
                self.exec_block(body)?;
            },
            Statement::If {
                condition,
                consequent,
                alternate,
            } => {
                let result = self.eval_condition(condition)?;
                self.emit(TraceEvent::IfTest {
                    condition: format_condition(condition),
                    result,
                })?;
                if result {
                    self.exec_block(consequent)
                } else if let Some(alternate) = alternate {
                    self.exec_block(alternate)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn eval_condition(&self, condition: &RelationalExpr) -> Result<bool, CoreError> {
        let left = self.eval_expr(&condition.left)?;
        let right = self.eval_expr(&condition.right)?;
        Ok(condition.operator.holds(left, right))
    }

    fn eval_expr(&self, expr: &Expr) -> Result<i32, CoreError> {
        match expr {
            Expr::NumberLiteral { value } => Ok(*value),
            Expr::Identifier { name } => self.env.get(name).ok_or_else(|| CoreError::undeclared(name)),
            Expr::BinaryExpr {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(operator.apply(left, right))
            }
        }
    }
}
