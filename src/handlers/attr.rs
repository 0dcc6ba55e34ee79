//! `data-volt-bind:<attr>`: sets or removes a plain HTML attribute (base
//! spec §4.7's "attr" handler, named `bind:` at the attribute surface). A
//! `false`/`null`/`undefined` result removes the attribute entirely (so
//! boolean attributes like `disabled`/`checked` behave the way the browser
//! expects: presence, not value, is what matters); anything else is string-
//! coerced and set, with a literal `true` written as the empty string per
//! HTML's own boolean-attribute convention.

use crate::error;
use crate::expr::Value;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let Some(name) = ctx.directive.arg.clone() else {
        return Err(crate::error::VoltError::InvalidBinding {
            attribute: "bind".to_string(),
            reason: "missing target attribute name, expected data-volt-bind:<name>".to_string(),
        });
    };
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    let effect = Effect::new(move || {
        match eval(&src, &scope) {
            Ok(value) => {
                let unwrapped = value.unwrap_tracked();
                match unwrapped {
                    Value::Bool(false) | Value::Null | Value::Undefined => element.remove_attribute(&name),
                    Value::Bool(true) => element.set_attribute(&name, ""),
                    other => element.set_attribute(&name, &other.to_display_string()),
                }
            }
            Err(err) => {
                error::report(err);
            }
        }
        None
    });
    Ok(Box::new(move || effect.dispose()))
}
