//! `data-volt-html`: sets `innerHTML` to the string coercion of an
//! expression. Unlike `text`, the result is parsed as markup by the browser,
//! so callers are responsible for not feeding it untrusted input — the same
//! trust boundary `dangerously_set_inner_html` names in the teacher's own
//! render layer (`sycamore_web::web_node`).

use crate::error;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let element = ctx.element.clone();
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    let effect = Effect::new(move || {
        match eval(&src, &scope) {
            Ok(value) => element.set_inner_html(&value.to_display_string()),
            Err(err) => {
                error::report(err);
            }
        }
        None
    });
    Ok(Box::new(move || effect.dispose()))
}
