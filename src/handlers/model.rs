//! `data-volt-model`: two-way binding between a form control and a single
//! named cell, resolved by scoped path with kebab-case-to-camelCase fallback
//! (base spec §4.7: a bare `user-name` attribute value binds to a scope
//! variable named `user-name` if one exists, else falls back to `userName`).
//! Direction cell→element is an [`Effect`] exactly like [`super::text`];
//! direction element→cell is a native listener that reads the control's
//! value back and assigns it through [`crate::expr::evaluate_assignment`],
//! so the same `env.set`/member-write rules (and the write-through-cell
//! behavior) apply as any other `=` expression would get.

use crate::dom::FormValue;
use crate::error;
use crate::expr::{Environment, Value};
use crate::reactive::Effect;
use crate::scope::Scope;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = resolve_model_path(ctx.value, &scope);
    let modifiers = ctx.directive.modifiers.clone();

    // element <- cell
    let write_element = element.clone();
    let write_scope = scope.clone();
    let write_src = src.clone();
    let effect = Effect::new(move || {
        match eval(&write_src, &write_scope) {
            Ok(value) => apply_to_element(&write_element, &value),
            Err(err) => {
                error::report(err);
            }
        }
        None
    });

    // element -> cell
    let event_name = if modifiers.lazy() {
        "change"
    } else {
        match element.tag_name().as_str() {
            "select" => "change",
            "input" => match element.get_attribute("type").as_deref() {
                Some("checkbox") | Some("radio") => "change",
                _ => "input",
            },
            _ => "input",
        }
    };

    let read_scope = scope.clone();
    let read_src = src.clone();
    let read_element = element.clone();
    let debounce_ms = modifiers.debounce_ms;
    let throttle_ms = modifiers.throttle_ms;
    let number = modifiers.number();
    let trim = modifiers.trim();

    let timer: std::rc::Rc<std::cell::Cell<Option<i32>>> = std::rc::Rc::new(std::cell::Cell::new(None));
    let last_run: std::rc::Rc<std::cell::Cell<f64>> = std::rc::Rc::new(std::cell::Cell::new(f64::NEG_INFINITY));

    let teardown_timer = timer.clone();
    let remove_listener = element.add_event_listener(event_name, false, false, move |_event| {
        let write = |element: &crate::dom::ElementHandle, scope: &crate::scope::Scope, src: &str| {
            let value = read_form_value(element, number, trim);
            if let Err(err) = crate::expr::evaluate_assignment(src, value, scope) {
                error::report(crate::error::VoltError::Evaluation {
                    expr: src.to_string(),
                    cause: err.to_string(),
                });
            }
        };

        if let Some(ms) = debounce_ms {
            if let Some(handle) = timer.take() {
                crate::dom::cancel_timeout(handle);
            }
            let element = read_element.clone();
            let scope = read_scope.clone();
            let src = read_src.clone();
            let timer = timer.clone();
            let handle = crate::dom::set_timeout(ms, move || {
                timer.set(None);
                write(&element, &scope, &src);
            });
            timer.set(Some(handle));
        } else if let Some(ms) = throttle_ms {
            let now = crate::dom::now_ms();
            if now - last_run.get() >= ms as f64 {
                last_run.set(now);
                write(&read_element, &read_scope, &read_src);
            }
        } else {
            write(&read_element, &read_scope, &read_src);
        }
    });

    Ok(Box::new(move || {
        effect.dispose();
        remove_listener();
        if let Some(handle) = teardown_timer.take() {
            crate::dom::cancel_timeout(handle);
        }
    }))
}

fn apply_to_element(element: &crate::dom::ElementHandle, value: &Value) {
    let unwrapped = value.unwrap_tracked();
    if element.tag_name() == "input" && element.get_attribute("type").as_deref() == Some("checkbox") {
        element.set_form_checked(unwrapped.truthy());
    } else if element.tag_name() == "input" && element.get_attribute("type").as_deref() == Some("radio") {
        let this_value = element.get_attribute("value").unwrap_or_default();
        element.set_form_checked(unwrapped.to_display_string() == this_value);
    } else {
        element.set_form_value(&unwrapped.to_display_string());
    }
}

fn read_form_value(element: &crate::dom::ElementHandle, number: bool, trim: bool) -> Value {
    match element.form_value() {
        FormValue::Bool(b) => Value::Bool(b),
        FormValue::Text(mut text) => {
            if trim {
                text = text.trim().to_string();
            }
            if number || element.get_attribute("type").as_deref() == Some("number") {
                match text.trim().parse::<f64>() {
                    Ok(n) => Value::Number(n),
                    Err(_) => Value::Number(f64::NAN),
                }
            } else {
                Value::String(std::rc::Rc::from(text.as_str()))
            }
        }
    }
}

/// If `src` is a bare name (no `.`/`[` path syntax) that doesn't already
/// resolve in `scope`, but its camelCase form does, bind to the camelCase
/// name instead. Leaves path expressions (`user.name`) and already-resolving
/// names untouched.
fn resolve_model_path(src: &str, scope: &Scope) -> String {
    if is_bare_name(src) && scope.get(src).is_none() {
        let camel = kebab_to_camel(src);
        if scope.get(&camel).is_some() {
            return camel;
        }
    }
    src.to_string()
}

fn is_bare_name(src: &str) -> bool {
    let mut chars = src.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

// `resolve_model_path`'s scope-lookup behavior needs a live `Scope`, which
// needs a real `ElementHandle` as its root origin — covered in
// `tests/web/model.rs` rather than here. The pure name-shape helpers below
// have no DOM dependency and are covered directly.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_accepts_letters_digits_underscore_hyphen() {
        assert!(is_bare_name("user-name"));
        assert!(is_bare_name("count"));
        assert!(is_bare_name("_private"));
        assert!(!is_bare_name("user.name"));
        assert!(!is_bare_name("items[0]"));
        assert!(!is_bare_name("1count"));
    }

    #[test]
    fn kebab_to_camel_normalizes() {
        assert_eq!(kebab_to_camel("user-name"), "userName");
        assert_eq!(kebab_to_camel("count"), "count");
    }
}

