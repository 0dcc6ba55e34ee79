//! The allow-listed global objects (`Math`, `JSON`, `Object`, `Array`,
//! `String`, `Number`, `Boolean`) an expression may call without the host
//! scope defining them (base spec §4.4, [`super::sandbox::SAFE_GLOBALS`]).
//!
//! Each global resolves to a `Value::Object` whose properties are
//! `Value::Function`s, so member-call syntax (`Math.max(a, b)`) falls out of
//! the evaluator's normal member-then-call path with no special case.

use std::rc::Rc;

use super::value::Value;

pub fn lookup(name: &str) -> Option<Value> {
    match name {
        "Math" => Some(math_namespace()),
        "JSON" => Some(json_namespace()),
        "Object" => Some(object_namespace()),
        "Array" => Some(array_namespace()),
        "String" => Some(Value::Function(Rc::new(|args| {
            Value::String(Rc::from(args.first().map(Value::to_display_string).unwrap_or_default().as_str()))
        }))),
        "Number" => Some(Value::Function(Rc::new(|args| {
            Value::Number(args.first().map(Value::as_number).unwrap_or(0.0))
        }))),
        "Boolean" => Some(Value::Function(Rc::new(|args| Value::Bool(args.first().map(Value::truthy).unwrap_or(false))))),
        _ => None,
    }
}

fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(Rc::new(std::cell::RefCell::new(
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    )))
}

fn func(f: impl Fn(&[Value]) -> Value + 'static) -> Value {
    Value::Function(Rc::new(f))
}

fn math_namespace() -> Value {
    obj(vec![
        ("abs", func(|a| Value::Number(num(a, 0).abs()))),
        ("floor", func(|a| Value::Number(num(a, 0).floor()))),
        ("ceil", func(|a| Value::Number(num(a, 0).ceil()))),
        ("round", func(|a| Value::Number(num(a, 0).round()))),
        ("trunc", func(|a| Value::Number(num(a, 0).trunc()))),
        ("sqrt", func(|a| Value::Number(num(a, 0).sqrt()))),
        (
            "pow",
            func(|a| Value::Number(num(a, 0).powf(num(a, 1)))),
        ),
        (
            "max",
            func(|a| Value::Number(a.iter().map(Value::as_number).fold(f64::NEG_INFINITY, f64::max))),
        ),
        (
            "min",
            func(|a| Value::Number(a.iter().map(Value::as_number).fold(f64::INFINITY, f64::min))),
        ),
        ("PI", Value::Number(std::f64::consts::PI)),
    ])
}

fn json_namespace() -> Value {
    obj(vec![
        (
            "stringify",
            func(|a| {
                let json = to_json(a.first().unwrap_or(&Value::Undefined));
                Value::String(Rc::from(serde_json::to_string(&json).unwrap_or_default().as_str()))
            }),
        ),
        (
            "parse",
            func(|a| {
                let text = a.first().map(Value::to_display_string).unwrap_or_default();
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(json) => Value::from_json(&json),
                    Err(_) => Value::Undefined,
                }
            }),
        ),
    ])
}

fn object_namespace() -> Value {
    obj(vec![
        (
            "keys",
            func(|a| match a.first() {
                Some(Value::Object(o)) => Value::Array(Rc::new(std::cell::RefCell::new(
                    o.borrow().iter().map(|(k, _)| Value::String(Rc::from(k.as_str()))).collect(),
                ))),
                _ => Value::Array(Rc::new(std::cell::RefCell::new(Vec::new()))),
            }),
        ),
        (
            "values",
            func(|a| match a.first() {
                Some(Value::Object(o)) => {
                    Value::Array(Rc::new(std::cell::RefCell::new(o.borrow().iter().map(|(_, v)| v.clone()).collect())))
                }
                _ => Value::Array(Rc::new(std::cell::RefCell::new(Vec::new()))),
            }),
        ),
        (
            "entries",
            func(|a| match a.first() {
                Some(Value::Object(o)) => Value::Array(Rc::new(std::cell::RefCell::new(
                    o.borrow()
                        .iter()
                        .map(|(k, v)| {
                            Value::Array(Rc::new(std::cell::RefCell::new(vec![
                                Value::String(Rc::from(k.as_str())),
                                v.clone(),
                            ])))
                        })
                        .collect(),
                ))),
                _ => Value::Array(Rc::new(std::cell::RefCell::new(Vec::new()))),
            }),
        ),
    ])
}

fn array_namespace() -> Value {
    obj(vec![(
        "isArray",
        func(|a| Value::Bool(matches!(a.first(), Some(Value::Array(_))))),
    )])
}

fn num(args: &[Value], idx: usize) -> f64 {
    args.get(idx).map(Value::as_number).unwrap_or(f64::NAN)
}

fn to_json(value: &Value) -> serde_json::Value {
    match value.unwrap_tracked() {
        Value::Undefined => serde_json::Value::Null,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(b),
        Value::Number(n) => serde_json::Number::from_f64(n).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.borrow().iter().map(to_json).collect()),
        Value::Object(props) => {
            serde_json::Value::Object(props.borrow().iter().map(|(k, v)| (k.clone(), to_json(v))).collect())
        }
        Value::Function(_) | Value::Reactive(_) => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn math_max_and_floor() {
        let math = math_namespace();
        if let Value::Object(o) = math {
            let max = o.borrow().iter().find(|(k, _)| k == "max").unwrap().1.clone();
            if let Value::Function(f) = max {
                assert_eq!(f(&[Value::Number(1.0), Value::Number(5.0)]).as_number(), 5.0);
            }
        }
    }

    #[test]
    fn json_roundtrip() {
        let json = json_namespace();
        if let Value::Object(o) = json {
            let stringify = o.borrow().iter().find(|(k, _)| k == "stringify").unwrap().1.clone();
            let parse = o.borrow().iter().find(|(k, _)| k == "parse").unwrap().1.clone();
            if let (Value::Function(s), Value::Function(p)) = (stringify, parse) {
                let text = s(&[Value::Number(42.0)]);
                assert_eq!(text.to_display_string(), "42");
                let back = p(&[text]);
                assert_eq!(back.as_number(), 42.0);
            }
        }
    }
}
