//! `data-volt-class` / `data-volt-class-<name>`: toggles classes based on
//! expression truthiness. With an argument, the expression is a single
//! boolean guard for that one class name. Without one, the expression must
//! evaluate to an object whose keys are class names and whose values decide
//! whether each is present — only classes this binding previously applied
//! are ever removed, so static classes on the element are left alone.

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

    if let Some(class_name) = ctx.directive.arg.clone() {
        let effect = Effect::new(move || {
            match eval(&src, &scope) {
                Ok(value) => {
                    if value.truthy() {
                        element.add_class(&class_name);
                    } else {
                        element.remove_class(&class_name);
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
                for (name, value) in entries.borrow().iter() {
                    if value.truthy() {
                        next.insert(name.clone());
                    }
                }
                let mut applied = applied.borrow_mut();
                for stale in applied.difference(&next) {
                    element.remove_class(stale);
                }
                for fresh in &next {
                    element.add_class(fresh);
                }
                *applied = next;
            }
            Ok(_) => {
                error::report(crate::error::VoltError::InvalidBinding {
                    attribute: "class".to_string(),
                    reason: "expected an object mapping class names to booleans".to_string(),
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
