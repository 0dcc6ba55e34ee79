//! `data-volt-text`: sets an element's text content to the string coercion
//! of an expression, re-running whenever a tracked dependency changes.

use crate::error;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    let effect = Effect::new(move || {
        match eval(&src, &scope) {
            Ok(value) => element.set_text(&value.to_display_string()),
            Err(err) => {
                error::report(err);
            }
        }
        None
    });
    Ok(Box::new(move || effect.dispose()))
}
