//! `data-volt-pin[-<name>]`: registers the element under `name` in the
//! scope's pin registry (visible to the whole mount subtree via `$pins`).
//! The name is a literal, not an expression: `data-volt-pin-sidebar` or
//! `data-volt-pin="sidebar"`.

use super::{BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let name = match &ctx.directive.arg {
        Some(arg) => arg.clone(),
        None => ctx.value.trim().to_string(),
    };
    if name.is_empty() {
        return Err(crate::error::VoltError::InvalidBinding {
            attribute: "pin".to_string(),
            reason: "missing pin name, expected data-volt-pin-<name> or data-volt-pin=\"name\"".to_string(),
        });
    }
    ctx.scope.register_pin(name, ctx.element.clone());
    Ok(Box::new(|| {}))
}
