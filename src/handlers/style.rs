//! `data-volt-style` / `data-volt-style-<prop>`: same shape as [`super::class`]
//! but for inline style properties instead of class names. With an argument,
//! the expression's string coercion becomes that one property's value (or
//! the property is removed if the expression is `null`/`undefined`/empty).
//! Without one, the expression must be an object mapping CSS property names
//! to values.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::error;
use crate::expr::Value;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    if let Some(prop) = ctx.directive.arg.clone() {
        let effect = Effect::new(move || {
            match eval(&src, &scope) {
                Ok(value) => {
                    let text = value.to_display_string();
                    if text.is_empty() {
                        element.remove_style_property(&prop);
                    } else {
                        element.set_style_property(&prop, &text);
                    }
                }
                Err(err) => {
                    error::report(err);
                }
            }
            None
        });
        return Ok(Box::new(move || effect.dispose()));
    }

    let applied: Rc<RefCell<HashSet<String>>> = Rc::new(RefCell::new(HashSet::new()));
    let effect = Effect::new(move || {
        match eval(&src, &scope) {
            Ok(Value::Object(entries)) => {
                let mut next = HashSet::new();
                for (prop, value) in entries.borrow().iter() {
                    let text = value.to_display_string();
                    if !text.is_empty() {
                        element.set_style_property(prop, &text);
                        next.insert(prop.clone());
                    }
                }
                let mut applied = applied.borrow_mut();
                for stale in applied.difference(&next) {
                    element.remove_style_property(stale);
                }
                *applied = next;
            }
            Ok(_) => {
                error::report(crate::error::VoltError::InvalidBinding {
                    attribute: "style".to_string(),
                    reason: "expected an object mapping CSS properties to values".to_string(),
                });
            }
            Err(err) => {
                error::report(err);
            }
        }
        None
    });
    Ok(Box::new(move || effect.dispose()))
}
