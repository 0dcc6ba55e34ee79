//! The embedded expression engine: a small, sandboxed JS-expression subset
//! used inside every `data-volt-*` attribute value (base spec §4.4).
//!
//! Pipeline: [`lexer`] → [`parser`] → [`cache`] (memoized per source text) →
//! [`eval`] (against an [`eval::Environment`], almost always
//! [`crate::scope::Scope`]). [`sandbox`] gates identifier/property access at
//! eval time. Dependency tracking itself is dynamic, not statically
//! extracted from the parsed expression: [`super::reactive::tracker`]
//! records a real cell read the moment `eval` performs it, which base spec
//! §9 calls out as an equally valid realization of the dependency-extractor
//! requirement to the static-AST-scan one it also describes.

mod ast;
mod builtins;
mod cache;
mod eval;
mod lexer;
mod parser;
mod sandbox;
mod value;

pub use ast::{Expr, Literal, Program, Stmt};
pub use cache::EvalMode;
pub use eval::{eval_expr, eval_statements, Environment, EvalError};
pub use parser::ParseError;
pub use sandbox::{SandboxViolation, SAFE_GLOBALS};
pub use value::{Reactive, Value};

/// Any failure from parsing through evaluation, the single error type
/// handlers need to convert into a [`crate::error::VoltError::Evaluation`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Compile (from cache, if possible) and evaluate `src` as a single
/// expression. This is the entry point every value-producing handler (text,
/// show, class, attr, interpolation, `if`/`for` sources) goes through.
pub fn evaluate_expression(src: &str, env: &dyn Environment) -> Result<Value, ExprError> {
    let program = cache::compile(src, EvalMode::Expression)?;
    match program.as_ref() {
        Program::Expression(expr) => Ok(eval_expr(expr, env)?),
        Program::Statements(_) => unreachable!("compile(Expression) always returns Program::Expression"),
    }
}

/// Compile (from cache, if possible) and evaluate `src` as a
/// semicolon-separated statement sequence. The entry point for handler
/// bodies: `on-*`, `init`, lifecycle hooks.
pub fn evaluate_statements(src: &str, env: &dyn Environment) -> Result<Value, ExprError> {
    let program = cache::compile(src, EvalMode::Statements)?;
    match program.as_ref() {
        Program::Statements(stmts) => Ok(eval_statements(stmts, env)?),
        Program::Expression(_) => unreachable!("compile(Statements) always returns Program::Statements"),
    }
}

/// Parse `target` as an expression and assign `value` into it — the same
/// write path an `=` expression goes through (write-through-cell for a plain
/// identifier, in-place mutation for a member target). Used by `model` to
/// push a form control's value back into its bound place without
/// round-tripping through source-text literals.
pub fn evaluate_assignment(target: &str, value: Value, env: &dyn Environment) -> Result<(), ExprError> {
    let program = cache::compile(target, EvalMode::Expression)?;
    match program.as_ref() {
        Program::Expression(expr) => Ok(eval::assign(expr, value, env)?),
        Program::Statements(_) => unreachable!("compile(Expression) always returns Program::Expression"),
    }
}
