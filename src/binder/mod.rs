//! The binder: walks a subtree in document order, dispatches each
//! candidate's directives to handlers, and aggregates every teardown the
//! walk produces into one [`MountHandle`]. `if`/`for` are structural — they
//! decide whether and how many times the rest of an element's bindings even
//! run — so they are always applied before the rest of an element's
//! directives and are dispatched directly rather than through
//! [`handlers::dispatch`], since both need the ambient attribute prefix to
//! recurse into their own bodies.

use std::collections::HashMap;

use crate::config::VoltConfig;
use crate::dom::walker::{self, Candidate};
use crate::dom::ElementHandle;
use crate::error;
use crate::expr::Value;
use crate::handlers::{self, for_loop, conditional, BindContext, Teardown};
use crate::scope::Scope;

/// Bind every `data-volt-*` candidate at or under `root` against `scope`,
/// returning one teardown per handler invocation. Used both for the
/// top-level [`mount`] and, recursively, whenever `if`/`for` instantiate a
/// body.
pub fn bind_subtree(root: &ElementHandle, scope: &Scope, prefix: &str) -> Vec<Teardown> {
    let mut teardowns = Vec::new();
    for candidate in walker::walk(root, prefix) {
        teardowns.extend(bind_candidate(candidate, scope, prefix));
    }
    teardowns
}

fn bind_candidate(candidate: Candidate, scope: &Scope, prefix: &str) -> Vec<Teardown> {
    let Candidate { element, mut directives } = candidate;
    // `for`/`if` take priority over any other directive on the same element
    // (base spec §4.6); in practice at most one of them is ever present.
    directives.sort_by_key(|(d, _)| if matches!(d.base.as_str(), "if" | "for") { 0 } else { 1 });

    let mut teardowns = Vec::new();
    for (directive, value) in &directives {
        let ctx = BindContext { element: &element, scope, directive, value };
        let result = match directive.base.as_str() {
            "for" => for_loop::bind(&ctx, prefix),
            "if" => conditional::bind(&ctx, prefix),
            _ => handlers::dispatch(&ctx),
        };
        match result {
            Ok(teardown) => teardowns.push(teardown),
            Err(err) => {
                error::report(err);
            }
        }
    }
    teardowns
}

/// A live mount: holds every teardown produced while binding, in the order
/// they were created, so [`Self::unmount`] can reverse them.
pub struct MountHandle {
    teardowns: Vec<Teardown>,
}

impl MountHandle {
    /// Dispose every binding this mount produced, in reverse order.
    pub fn unmount(self) {
        for teardown in self.teardowns.into_iter().rev() {
            teardown();
        }
    }
}

/// Bind `root` and its descendants, seeding the root scope with `vars`
/// (e.g. an application's top-level reactive cells) before the first
/// binding pass runs, using [`VoltConfig::default`].
pub fn mount(root: ElementHandle, vars: HashMap<String, Value>) -> MountHandle {
    mount_with_config(root, vars, &VoltConfig::default())
}

/// Same as [`mount`], with an explicit [`VoltConfig`] (e.g. a non-default
/// attribute prefix). If `root` carries a `data-volt-state` attribute, it is
/// parsed as a JSON object and each key becomes a cell in the root scope
/// (base spec §6) before `vars` is applied, so a caller-supplied cell of the
/// same name wins over the markup-declared one.
pub fn mount_with_config(root: ElementHandle, vars: HashMap<String, Value>, config: &VoltConfig) -> MountHandle {
    let scope = Scope::root(root.clone());
    seed_state(&root, &scope, config.prefix());
    for (name, value) in vars {
        scope.define(name, value);
    }
    let teardowns = bind_subtree(&root, &scope, config.prefix());
    MountHandle { teardowns }
}

fn seed_state(root: &ElementHandle, scope: &Scope, prefix: &str) {
    let Some(raw) = root.get_attribute(&format!("{prefix}state")) else {
        return;
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Object(map)) => {
            for (key, value) in map {
                scope.define(key, Value::cell(Value::from_json(&value)));
            }
        }
        _ => {
            error::report(crate::error::VoltError::InvalidBinding {
                attribute: "state".to_string(),
                reason: "data-volt-state must be a JSON object".to_string(),
            });
        }
    }
}
