//! Tree-walking evaluator. Auto-unwraps [`Reactive`](super::value::Reactive)
//! values transparently (base spec §4.4) except where the expression calls
//! `.get()`/`.set()`/`.subscribe()` explicitly, and enforces the sandbox on
//! every identifier and property access.

use std::rc::Rc;

use super::ast::*;
use super::builtins;
use super::sandbox::{self, SandboxViolation};
use super::value::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Sandbox(#[from] SandboxViolation),
    #[error("`{name}` is not defined")]
    UndefinedIdentifier { name: String },
    #[error("cannot assign to this expression")]
    InvalidAssignmentTarget,
    #[error("`{name}` is not a function")]
    NotCallable { name: String },
    #[error("property `{name}` does not exist on this value")]
    NoSuchProperty { name: String },
}

/// Where identifiers resolve to and where assignments land. Implemented by
/// [`crate::scope::Scope`]; kept as a trait here so the expression engine has
/// no dependency on the DOM-binding data model.
pub trait Environment {
    fn get(&self, name: &str) -> Option<Value>;
    /// Assign `value` to `name`. Returns `false` if `name` is not bound in
    /// this environment (assigning to an unbound identifier is a no-op
    /// error, not an implicit global, unlike loose-mode JS).
    fn set(&self, name: &str, value: Value) -> bool;
}

pub fn eval_expr(expr: &Expr, env: &dyn Environment) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(lit) => Ok(literal_value(lit)),
        Expr::Identifier(name) => resolve_identifier(name, env),
        Expr::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval_expr(item, env)?);
            }
            Ok(Value::Array(Rc::new(std::cell::RefCell::new(out))))
        }
        Expr::Object(props) => {
            let mut out = Vec::with_capacity(props.len());
            for (key, value_expr) in props {
                let key = match key {
                    PropKey::Ident(s) | PropKey::String(s) => s.clone(),
                    PropKey::Computed(e) => eval_expr(e, env)?.to_display_string(),
                };
                out.push((key, eval_expr(value_expr, env)?));
            }
            Ok(Value::Object(Rc::new(std::cell::RefCell::new(out))))
        }
        Expr::Unary { op, expr } => eval_unary(*op, expr, env),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, env)?;
            let r = eval_expr(right, env)?;
            Ok(eval_binary(*op, &l, &r))
        }
        Expr::Logical { op, left, right } => eval_logical(*op, left, right, env),
        Expr::Conditional { test, consequent, alternate } => {
            if eval_expr(test, env)?.truthy() {
                eval_expr(consequent, env)
            } else {
                eval_expr(alternate, env)
            }
        }
        Expr::Member { object, property, optional } => {
            let obj = eval_expr(object, env)?;
            if *optional && matches!(obj.unwrap_tracked(), Value::Undefined | Value::Null) {
                return Ok(Value::Undefined);
            }
            let prop = resolve_prop_name(property, env)?;
            member_get(&obj, &prop)
        }
        Expr::Call { callee, args, optional } => eval_call(callee, args, *optional, env),
        Expr::Assignment { op, target, value } => {
            let rhs = eval_expr(value, env)?;
            let new_value = match op {
                AssignOp::Assign => rhs,
                _ => {
                    let current = eval_expr(target, env)?;
                    let bin_op = match op {
                        AssignOp::AddAssign => BinaryOp::Add,
                        AssignOp::SubAssign => BinaryOp::Sub,
                        AssignOp::MulAssign => BinaryOp::Mul,
                        AssignOp::DivAssign => BinaryOp::Div,
                        AssignOp::Assign => unreachable!(),
                    };
                    eval_binary(bin_op, &current, &rhs)
                }
            };
            assign(target, new_value.clone(), env)?;
            Ok(new_value)
        }
        Expr::Update { op, prefix, target } => {
            let current = eval_expr(target, env)?.as_number();
            let updated = match op {
                UpdateOp::Increment => current + 1.0,
                UpdateOp::Decrement => current - 1.0,
            };
            assign(target, Value::Number(updated), env)?;
            Ok(Value::Number(if *prefix { updated } else { current }))
        }
    }
}

/// Executes a sequence of statements, returning the last expression
/// statement's value (used by handler bodies that end in an expression, the
/// same "last statement is the value" convention the engine's `if` directive
/// does not need but `init`/`on-*` bodies benefit from for consistency).
pub fn eval_statements(stmts: &[Stmt], env: &dyn Environment) -> Result<Value, EvalError> {
    let mut last = Value::Undefined;
    for stmt in stmts {
        last = eval_stmt(stmt, env)?;
    }
    Ok(last)
}

fn eval_stmt(stmt: &Stmt, env: &dyn Environment) -> Result<Value, EvalError> {
    match stmt {
        Stmt::Expr(e) => eval_expr(e, env),
        Stmt::Block(stmts) => eval_statements(stmts, env),
        Stmt::If { test, consequent, alternate } => {
            if eval_expr(test, env)?.truthy() {
                eval_stmt(consequent, env)
            } else if let Some(alt) = alternate {
                eval_stmt(alt, env)
            } else {
                Ok(Value::Undefined)
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(Rc::from(s.as_str())),
    }
}

fn resolve_identifier(name: &str, env: &dyn Environment) -> Result<Value, EvalError> {
    sandbox::check_identifier(name)?;
    if let Some(v) = env.get(name) {
        return Ok(v);
    }
    if let Some(v) = builtins::lookup(name) {
        return Ok(v);
    }
    // A missing identifier evaluates to undefined rather than throwing (base
    // spec §4.4), mirroring how `member_get` already treats an unknown
    // property path.
    Ok(Value::Undefined)
}

fn resolve_prop_name(prop: &MemberProp, env: &dyn Environment) -> Result<String, EvalError> {
    match prop {
        MemberProp::Static(s) => Ok(s.clone()),
        MemberProp::Computed(e) => Ok(eval_expr(e, env)?.to_display_string()),
    }
}

fn eval_unary(op: UnaryOp, expr: &Expr, env: &dyn Environment) -> Result<Value, EvalError> {
    let v = eval_expr(expr, env)?;
    Ok(match op {
        UnaryOp::Not => Value::Bool(!v.truthy()),
        UnaryOp::Neg => Value::Number(-v.as_number()),
        UnaryOp::Plus => Value::Number(v.as_number()),
        UnaryOp::Typeof => Value::String(Rc::from(type_of(&v))),
    })
}

fn type_of(v: &Value) -> &'static str {
    match v.unwrap_tracked() {
        Value::Undefined => "undefined",
        Value::Null => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) | Value::Element(_) => "object",
        Value::Function(_) => "function",
        Value::Reactive(_) => unreachable!(),
    }
}

fn eval_logical(op: LogicalOp, left: &Expr, right: &Expr, env: &dyn Environment) -> Result<Value, EvalError> {
    let l = eval_expr(left, env)?;
    match op {
        LogicalOp::And => {
            if l.truthy() {
                eval_expr(right, env)
            } else {
                Ok(l)
            }
        }
        LogicalOp::Or => {
            if l.truthy() {
                Ok(l)
            } else {
                eval_expr(right, env)
            }
        }
        LogicalOp::NullishCoalesce => match l.unwrap_tracked() {
            Value::Null | Value::Undefined => eval_expr(right, env),
            _ => Ok(l),
        },
    }
}

fn eval_binary(op: BinaryOp, l: &Value, r: &Value) -> Value {
    match op {
        BinaryOp::Add => {
            let (lv, rv) = (l.unwrap_tracked(), r.unwrap_tracked());
            if matches!(lv, Value::String(_)) || matches!(rv, Value::String(_)) {
                Value::String(Rc::from(format!("{}{}", lv.to_display_string(), rv.to_display_string()).as_str()))
            } else {
                Value::Number(lv.as_number() + rv.as_number())
            }
        }
        BinaryOp::Sub => Value::Number(l.as_number() - r.as_number()),
        BinaryOp::Mul => Value::Number(l.as_number() * r.as_number()),
        BinaryOp::Div => Value::Number(l.as_number() / r.as_number()),
        BinaryOp::Mod => Value::Number(l.as_number() % r.as_number()),
        BinaryOp::Eq => Value::Bool(l.strict_eq(r)),
        BinaryOp::NotEq => Value::Bool(!l.strict_eq(r)),
        BinaryOp::Lt => Value::Bool(l.as_number() < r.as_number()),
        BinaryOp::LtEq => Value::Bool(l.as_number() <= r.as_number()),
        BinaryOp::Gt => Value::Bool(l.as_number() > r.as_number()),
        BinaryOp::GtEq => Value::Bool(l.as_number() >= r.as_number()),
    }
}

fn member_get(obj: &Value, prop: &str) -> Result<Value, EvalError> {
    sandbox::check_property(prop)?;
    match obj {
        Value::Reactive(r) => match prop {
            "get" => {
                let r = r.clone();
                Ok(Value::Function(Rc::new(move |_| r.read())))
            }
            "set" => {
                let r = r.clone();
                Ok(Value::Function(Rc::new(move |args| {
                    r.write(args.first().cloned().unwrap_or(Value::Undefined));
                    Value::Undefined
                })))
            }
            _ => member_get(&obj.unwrap_tracked(), prop),
        },
        Value::Array(items) => array_member(items, prop),
        Value::String(s) => string_member(s, prop),
        Value::Object(entries) => {
            let found = entries.borrow().iter().find(|(k, _)| k == prop).map(|(_, v)| v.clone());
            Ok(found.unwrap_or(Value::Undefined))
        }
        _ => Ok(Value::Undefined),
    }
}

fn array_member(items: &Rc<std::cell::RefCell<Vec<Value>>>, prop: &str) -> Result<Value, EvalError> {
    if prop == "length" {
        return Ok(Value::Number(items.borrow().len() as f64));
    }
    let items = items.clone();
    Ok(match prop {
        "push" => Value::Function(Rc::new(move |args| {
            items.borrow_mut().extend(args.iter().cloned());
            Value::Number(items.borrow().len() as f64)
        })),
        "pop" => Value::Function(Rc::new(move |_| items.borrow_mut().pop().unwrap_or(Value::Undefined))),
        "includes" => Value::Function(Rc::new(move |args| {
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            Value::Bool(items.borrow().iter().any(|v| v.strict_eq(&needle)))
        })),
        "indexOf" => Value::Function(Rc::new(move |args| {
            let needle = args.first().cloned().unwrap_or(Value::Undefined);
            Value::Number(
                items
                    .borrow()
                    .iter()
                    .position(|v| v.strict_eq(&needle))
                    .map(|i| i as f64)
                    .unwrap_or(-1.0),
            )
        })),
        "join" => Value::Function(Rc::new(move |args| {
            let sep = args.first().map(Value::to_display_string).unwrap_or_else(|| ",".into());
            Value::String(Rc::from(
                items.borrow().iter().map(Value::to_display_string).collect::<Vec<_>>().join(&sep).as_str(),
            ))
        })),
        "slice" => Value::Function(Rc::new(move |args| {
            let v = items.borrow();
            let len = v.len() as i64;
            let norm = |n: i64| -> usize { (if n < 0 { (len + n).max(0) } else { n.min(len) }) as usize };
            let start = args.first().map(Value::as_number).map(|n| norm(n as i64)).unwrap_or(0);
            let end = args.get(1).map(Value::as_number).map(|n| norm(n as i64)).unwrap_or(v.len());
            Value::Array(Rc::new(std::cell::RefCell::new(v.get(start..end.max(start)).unwrap_or(&[]).to_vec())))
        })),
        _ => return Err(EvalError::NoSuchProperty { name: prop.to_string() }),
    })
}

fn string_member(s: &Rc<str>, prop: &str) -> Result<Value, EvalError> {
    if prop == "length" {
        return Ok(Value::Number(s.chars().count() as f64));
    }
    let s = s.clone();
    Ok(match prop {
        "toUpperCase" => Value::Function(Rc::new(move |_| Value::String(Rc::from(s.to_uppercase().as_str())))),
        "toLowerCase" => Value::Function(Rc::new(move |_| Value::String(Rc::from(s.to_lowercase().as_str())))),
        "trim" => Value::Function(Rc::new(move |_| Value::String(Rc::from(s.trim())))),
        "includes" => {
            Value::Function(Rc::new(move |args| Value::Bool(s.contains(&args.first().map(Value::to_display_string).unwrap_or_default()))))
        }
        _ => return Err(EvalError::NoSuchProperty { name: prop.to_string() }),
    })
}

fn eval_call(callee: &Expr, args: &[Expr], optional: bool, env: &dyn Environment) -> Result<Value, EvalError> {
    let callee_name = match callee {
        Expr::Identifier(n) => n.clone(),
        Expr::Member { property: MemberProp::Static(n), .. } => n.clone(),
        _ => "<expression>".to_string(),
    };
    let func_value = eval_expr(callee, env)?;
    if optional && matches!(func_value.unwrap_tracked(), Value::Undefined | Value::Null) {
        return Ok(Value::Undefined);
    }
    let mut evaluated_args = Vec::with_capacity(args.len());
    for a in args {
        evaluated_args.push(eval_expr(a, env)?);
    }
    match func_value.unwrap_tracked() {
        Value::Function(f) => Ok(f(&evaluated_args)),
        _ => Err(EvalError::NotCallable { name: callee_name }),
    }
}

pub(crate) fn assign(target: &Expr, value: Value, env: &dyn Environment) -> Result<(), EvalError> {
    match target {
        Expr::Identifier(name) => {
            sandbox::check_identifier(name)?;
            // Assigning to an identifier bound to a reactive cell writes
            // through the cell rather than rebinding the name, so `count =
            // count + 1` behaves like `count.set(count.get() + 1)` when
            // `count` is a cell (base spec §4.4's two-way binding shorthand).
            if let Some(Value::Reactive(r)) = env.get(name) {
                if r.write(value) {
                    return Ok(());
                }
            }
            if env.set(name, value) {
                Ok(())
            } else {
                Err(EvalError::UndefinedIdentifier { name: name.clone() })
            }
        }
        Expr::Member { object, property, .. } => {
            let obj = eval_expr(object, env)?;
            let prop = resolve_prop_name(property, env)?;
            sandbox::check_property(&prop)?;
            match obj.unwrap_tracked() {
                Value::Object(entries) => {
                    let mut entries = entries.borrow_mut();
                    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == prop) {
                        if let Value::Reactive(r) = &slot.1 {
                            if r.write(value) {
                                return Ok(());
                            }
                        }
                        slot.1 = value;
                    } else {
                        entries.push((prop, value));
                    }
                    Ok(())
                }
                Value::Array(items) => {
                    if let Ok(index) = prop.parse::<usize>() {
                        let mut items = items.borrow_mut();
                        if index >= items.len() {
                            items.resize(index + 1, Value::Undefined);
                        }
                        items[index] = value;
                        Ok(())
                    } else {
                        Err(EvalError::InvalidAssignmentTarget)
                    }
                }
                _ => Err(EvalError::InvalidAssignmentTarget),
            }
        }
        _ => Err(EvalError::InvalidAssignmentTarget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct TestEnv(RefCell<HashMap<String, Value>>);
    impl Environment for TestEnv {
        fn get(&self, name: &str) -> Option<Value> {
            self.0.borrow().get(name).cloned()
        }
        fn set(&self, name: &str, value: Value) -> bool {
            if self.0.borrow().contains_key(name) {
                self.0.borrow_mut().insert(name.to_string(), value);
                true
            } else {
                false
            }
        }
    }

    fn env(vars: &[(&str, Value)]) -> TestEnv {
        TestEnv(RefCell::new(vars.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()))
    }

    #[test]
    fn arithmetic_and_string_concat() {
        let e = env(&[]);
        let expr = crate::expr::parser::parse_expression("1 + 2").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().as_number(), 3.0);

        let expr = crate::expr::parser::parse_expression("'a' + 1").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().to_display_string(), "a1");
    }

    #[test]
    fn auto_unwraps_reactive_cell_on_read() {
        let e = env(&[("count", Value::cell(Value::Number(1.0)))]);
        let expr = crate::expr::parser::parse_expression("count + 1").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().as_number(), 2.0);
    }

    #[test]
    fn assignment_writes_through_cell() {
        let cell = Value::cell(Value::Number(1.0));
        let e = env(&[("count", cell.clone())]);
        let expr = crate::expr::parser::parse_expression("count = count + 1").unwrap();
        eval_expr(&expr, &e).unwrap();
        assert_eq!(cell.unwrap_untracked().as_number(), 2.0);
    }

    #[test]
    fn blocked_identifier_errors() {
        let e = env(&[]);
        let expr = crate::expr::parser::parse_expression("window").unwrap();
        assert!(matches!(eval_expr(&expr, &e), Err(EvalError::Sandbox(_))));
    }

    #[test]
    fn blocked_property_errors() {
        let e = env(&[("todos", Value::Array(Rc::new(RefCell::new(vec![]))))]);
        let expr = crate::expr::parser::parse_expression("todos.constructor").unwrap();
        assert!(matches!(eval_expr(&expr, &e), Err(EvalError::Sandbox(_))));
    }

    #[test]
    fn array_methods_work() {
        let e = env(&[(
            "items",
            Value::Array(Rc::new(RefCell::new(vec![Value::Number(1.0), Value::Number(2.0)]))),
        )]);
        let expr = crate::expr::parser::parse_expression("items.length").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().as_number(), 2.0);

        let expr = crate::expr::parser::parse_expression("items.includes(1)").unwrap();
        assert!(eval_expr(&expr, &e).unwrap().truthy());
    }

    #[test]
    fn ternary_and_logical_short_circuit() {
        let e = env(&[]);
        let expr = crate::expr::parser::parse_expression("true ? 1 : 2").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().as_number(), 1.0);

        let expr = crate::expr::parser::parse_expression("null ?? 5").unwrap();
        assert_eq!(eval_expr(&expr, &e).unwrap().as_number(), 5.0);
    }
}
