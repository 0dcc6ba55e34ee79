//! `data-volt-if` (and its optional `data-volt-else` sibling): a two-state
//! machine over `{ifBranch, elseBranch, none}` (base spec §4.7). At bind
//! time both the `if` element and an immediately-following `else` sibling
//! (if any) are detached and kept as templates; a comment placeholder marks
//! where the active branch, if any, is (re)inserted. Unlike `show`, which
//! only toggles `display`, the losing branch's whole subtree — and every
//! binding inside it — is torn down and its handlers disposed.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::Node;

use crate::dom::attr;
use crate::dom::ElementHandle;
use crate::error;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Branch {
    If,
    Else,
    None,
}

struct Rendered {
    branch: Branch,
    teardowns: Vec<Teardown>,
    element: Option<ElementHandle>,
}

pub fn bind(ctx: &BindContext, prefix: &str) -> Result<Teardown, crate::error::VoltError> {
    let if_template = ctx.element.clone();
    let Some(parent) = if_template.as_web_sys().parent_node() else {
        return Err(crate::error::VoltError::InvalidBinding {
            attribute: "if".to_string(),
            reason: "element has no parent to bind a conditional against".to_string(),
        });
    };
    let else_template = next_else_sibling(&if_template, prefix);

    let document = web_sys::window().and_then(|w| w.document()).expect("document must exist to bind `if`");
    let placeholder: Node = document.create_comment("volt-if").unchecked_into();

    let if_node: &Node = if_template.as_web_sys();
    parent.insert_before(&placeholder, Some(if_node)).ok();
    parent.remove_child(if_node).ok();
    if let Some(else_el) = &else_template {
        parent.remove_child(else_el.as_web_sys()).ok();
    }

    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();
    let prefix = prefix.to_string();
    let state = Rc::new(RefCell::new(Rendered { branch: Branch::None, teardowns: Vec::new(), element: None }));

    let effect_parent = parent.clone();
    let effect_placeholder = placeholder.clone();
    let effect_state = state.clone();
    let effect = Effect::new(move || {
        let target = match eval(&src, &scope) {
            Ok(value) => {
                if value.truthy() {
                    Branch::If
                } else if else_template.is_some() {
                    Branch::Else
                } else {
                    Branch::None
                }
            }
            Err(err) => {
                error::report(err);
                Branch::None
            }
        };

        let mut rendered = effect_state.borrow_mut();
        if rendered.branch == target {
            return;
        }
        for teardown in rendered.teardowns.drain(..) {
            teardown();
        }
        if let Some(el) = rendered.element.take() {
            let _ = effect_parent.remove_child(el.as_web_sys());
        }

        let template = match target {
            Branch::If => Some(&if_template),
            Branch::Else => else_template.as_ref(),
            Branch::None => None,
        };
        if let Some(template) = template {
            let clone = template.clone_node_deep();
            let _ = effect_parent.insert_before(clone.as_web_sys(), Some(&effect_placeholder));
            rendered.teardowns = crate::binder::bind_subtree(&clone, &scope, &prefix);
            rendered.element = Some(clone);
        }
        rendered.branch = target;
        None
    });

    Ok(Box::new(move || {
        effect.dispose();
        let mut rendered = state.borrow_mut();
        for teardown in rendered.teardowns.drain(..) {
            teardown();
        }
    }))
}

fn next_else_sibling(if_el: &ElementHandle, prefix: &str) -> Option<ElementHandle> {
    let sibling = if_el.next_element_sibling()?;
    let is_else = sibling
        .attributes()
        .iter()
        .any(|(name, _)| attr::is_volt_attribute(name, prefix) && attr::parse_directive(name, prefix).base == "else");
    is_else.then_some(sibling)
}
