//! `data-volt-show`: toggles `display: none` based on truthiness, leaving the
//! element mounted (unlike `if`, which removes it from the DOM entirely).

use crate::error;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    let effect = Effect::new(move || {
        match eval(&src, &scope) {
            Ok(value) => element.set_display_none(!value.truthy()),
            Err(err) => {
                error::report(err);
            }
        }
        None
    });
    Ok(Box::new(move || effect.dispose()))
}
