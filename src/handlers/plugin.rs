//! Plugin registry for directive names outside the built-in set (base spec
//! §4.6's "unknown directive" path): `register_plugin` installs a handler
//! under a name, and [`dispatch`] routes unrecognized directives to it, or
//! reports [`crate::error::VoltError::UnknownDirective`] if none matches.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::VoltError;

use super::{BindContext, Teardown};

pub type PluginHandler = Rc<dyn Fn(&BindContext) -> Result<Teardown, VoltError>>;

thread_local! {
    static PLUGINS: RefCell<HashMap<String, PluginHandler>> = RefCell::new(HashMap::new());
}

/// Install `handler` under `name`, replacing any previous registration.
pub fn register_plugin(name: impl Into<String>, handler: PluginHandler) {
    PLUGINS.with(|p| {
        p.borrow_mut().insert(name.into(), handler);
    });
}

/// Remove whatever plugin is registered under `name`, if any.
pub fn unregister_plugin(name: &str) {
    PLUGINS.with(|p| {
        p.borrow_mut().remove(name);
    });
}

pub(crate) fn dispatch(name: &str, ctx: &BindContext) -> Result<Teardown, VoltError> {
    let handler = PLUGINS.with(|p| p.borrow().get(name).cloned());
    match handler {
        Some(handler) => handler(ctx),
        None => Err(VoltError::UnknownDirective { directive: name.to_string() }),
    }
}

// `dispatch` needs a live `BindContext` (an `ElementHandle` and a `Scope`
// rooted in one), so its coverage lives in `tests/web/plugin.rs` alongside
// the rest of the DOM-dependent suite rather than inline here.
