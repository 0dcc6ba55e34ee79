//! `data-volt-init`: runs its body once, in statement mode, at bind time.
//! No subscriptions are created and there is nothing to tear down.

use crate::error;

use super::{eval_stmts, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    if let Err(err) = eval_stmts(ctx.value, ctx.scope) {
        error::report(err);
    }
    Ok(Box::new(|| {}))
}
