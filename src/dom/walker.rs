//! Document-order traversal for mount-time binding discovery (base spec
//! §4.1, §4.6). A `for`/`if` element owns its descendants' lifecycle (the
//! loop body is re-instantiated per item, the conditional body is torn down
//! and rebuilt), so the walker must not also bind them directly — it stops
//! descending exactly at those boundaries and lets the matching handler
//! recurse into the subtree on its own terms.

use super::attr::{self, DirectiveName};
use super::ElementHandle;

/// An element queued for binding, with its `data-volt-*` attributes already
/// parsed, in the order the binder should apply them (base spec §4.6: `for`
/// and `if` take priority over every other directive on the same element,
/// since they decide whether/how many times the rest even run).
pub struct Candidate {
    pub element: ElementHandle,
    /// Each directive paired with its attribute's raw value text (the
    /// expression, statement body, or pin name the binder hands to the
    /// handler as `BindContext::value`).
    pub directives: Vec<(DirectiveName, String)>,
}

/// Walk `root` and its descendants in document order, yielding one
/// [`Candidate`] per element that carries at least one `data-volt-*`
/// attribute. Descent stops (does not recurse into children) at any element
/// carrying `for` or `if`: those handlers own their subtree's traversal.
/// Elements marked `data-volt-skip` are skipped entirely, themselves and
/// their descendants (base spec §6's escape hatch for third-party widgets).
pub fn walk(root: &ElementHandle, prefix: &str) -> Vec<Candidate> {
    let mut out = Vec::new();
    walk_into(root, prefix, &mut out);
    out
}

fn walk_into(el: &ElementHandle, prefix: &str, out: &mut Vec<Candidate>) {
    if el.get_attribute(&format!("{prefix}skip")).is_some() {
        return;
    }

    let state_attr = format!("{prefix}state");
    let attrs = el.attributes();
    let directives: Vec<(DirectiveName, String)> = attrs
        .iter()
        .filter(|(name, _)| attr::is_volt_attribute(name, prefix) && name != &state_attr)
        .map(|(name, value)| (attr::parse_directive(name, prefix), value.clone()))
        .collect();

    let is_else_marker = directives.iter().any(|(d, _)| d.base == "else");
    let owns_subtree = is_else_marker || directives.iter().any(|(d, _)| d.base == "for" || d.base == "if");

    // `else` is a pure marker consumed by its preceding `if` sibling
    // (`handlers::conditional`); it is never bound as a candidate in its own
    // right, and its subtree is only ever instantiated from the stashed
    // template, never walked here.
    if !directives.is_empty() && !is_else_marker {
        remove_cloak(el, prefix);
        out.push(Candidate { element: el.clone(), directives: directives.clone() });
    }

    if owns_subtree {
        // The `for`/`if`/`else` handler is responsible for recursing into
        // this element's children on its own schedule; the walker stops here.
        return;
    }

    for child in el.children() {
        walk_into(&child, prefix, out);
    }
}

/// Walk the static children of a loop/conditional body element, used by
/// `handlers::for_loop`/`handlers::conditional` once they have decided to
/// instantiate the body: equivalent to [`walk`] but starting from the body
/// root itself rather than skipping it.
pub fn walk_body(body_root: &ElementHandle, prefix: &str) -> Vec<Candidate> {
    walk(body_root, prefix)
}

/// Removes `data-volt-cloak` (base spec §6: present in markup to hide
/// unbound templates via CSS, stripped the moment binding begins so the
/// element becomes visible).
fn remove_cloak(el: &ElementHandle, prefix: &str) {
    let cloak = format!("{prefix}cloak");
    if el.get_attribute(&cloak).is_some() {
        el.remove_attribute(&cloak);
    }
}
