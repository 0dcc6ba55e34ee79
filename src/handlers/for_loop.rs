//! `data-volt-for`: `ident in expr` or `(ident, idxIdent) in expr` (base
//! spec §4.7). At bind time the template element is detached and replaced
//! with a comment placeholder; on every re-evaluation of `expr` every
//! previously rendered instance is torn down and the whole array is
//! re-rendered from scratch. This crate does not keyed-diff loop bodies —
//! an implementer may add that without changing the observable contract,
//! but it is out of scope here.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::Node;

use crate::error::VoltError;
use crate::expr::Value;
use crate::reactive::Effect;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext, prefix: &str) -> Result<Teardown, VoltError> {
    let (item_name, idx_name, source_expr) = parse_loop_header(ctx.value)?;

    let template = ctx.element.clone();
    let Some(parent) = template.as_web_sys().parent_node() else {
        return Err(VoltError::InvalidBinding {
            attribute: "for".to_string(),
            reason: "element has no parent to bind a loop against".to_string(),
        });
    };
    let document = web_sys::window().and_then(|w| w.document()).expect("document must exist to bind `for`");
    let placeholder: Node = document.create_comment("volt-for").unchecked_into();
    let template_node: &Node = template.as_web_sys();
    parent.insert_before(&placeholder, Some(template_node)).ok();
    parent.remove_child(template_node).ok();

    let scope = ctx.scope.clone();
    let prefix = prefix.to_string();
    let rendered: Rc<RefCell<Vec<(Teardown, crate::dom::ElementHandle)>>> = Rc::new(RefCell::new(Vec::new()));

    let effect_parent = parent.clone();
    let effect_placeholder = placeholder.clone();
    let effect_rendered = rendered.clone();
    let effect = Effect::new(move || {
        for (teardown, el) in effect_rendered.borrow_mut().drain(..) {
            teardown();
            let _ = effect_parent.remove_child(el.as_web_sys());
        }

        match eval(&source_expr, &scope) {
            Ok(value) => match value.unwrap_tracked() {
                Value::Array(items) => {
                    let items = items.borrow().clone();
                    let mut new_rendered = Vec::with_capacity(items.len());
                    for (index, item) in items.into_iter().enumerate() {
                        let mut vars = HashMap::new();
                        vars.insert(item_name.clone(), item);
                        if let Some(idx_name) = &idx_name {
                            vars.insert(idx_name.clone(), Value::Number(index as f64));
                        }
                        let item_scope = scope.extend(vars);
                        let clone = template.clone_node_deep();
                        let _ = effect_parent.insert_before(clone.as_web_sys(), Some(&effect_placeholder));
                        let teardowns = crate::binder::bind_subtree(&clone, &item_scope, &prefix);
                        new_rendered.push((combine(teardowns), clone));
                    }
                    *effect_rendered.borrow_mut() = new_rendered;
                }
                _ => {
                    crate::error::report(VoltError::InvalidBinding {
                        attribute: "for".to_string(),
                        reason: "loop source did not evaluate to an array".to_string(),
                    });
                }
            },
            Err(err) => {
                crate::error::report(err);
            }
        }
        None
    });

    Ok(Box::new(move || {
        effect.dispose();
        for (teardown, el) in rendered.borrow_mut().drain(..) {
            teardown();
            let _ = parent.remove_child(el.as_web_sys());
        }
    }))
}

fn combine(teardowns: Vec<Teardown>) -> Teardown {
    Box::new(move || {
        for teardown in teardowns {
            teardown();
        }
    })
}

/// Parse `"ident in expr"` / `"(ident, idxIdent) in expr"` into
/// `(item binding, optional index binding, source expression text)`.
fn parse_loop_header(src: &str) -> Result<(String, Option<String>, String), VoltError> {
    let src = src.trim();
    let Some(split_at) = src.find(" in ") else {
        return Err(VoltError::InvalidBinding {
            attribute: "for".to_string(),
            reason: format!("expected `ident in expr` or `(ident, idx) in expr`, got `{src}`"),
        });
    };
    let (lhs, rhs) = (src[..split_at].trim(), src[split_at + 4..].trim());
    if rhs.is_empty() {
        return Err(VoltError::InvalidBinding {
            attribute: "for".to_string(),
            reason: "missing loop source expression after `in`".to_string(),
        });
    }

    if let Some(inner) = lhs.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let mut parts = inner.split(',').map(str::trim);
        let item = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| VoltError::InvalidBinding {
            attribute: "for".to_string(),
            reason: "missing item identifier in `(ident, idx) in expr`".to_string(),
        })?;
        let idx = parts.next().filter(|s| !s.is_empty());
        Ok((item.to_string(), idx.map(str::to_string), rhs.to_string()))
    } else if lhs.is_empty() {
        Err(VoltError::InvalidBinding {
            attribute: "for".to_string(),
            reason: "missing item identifier before `in`".to_string(),
        })
    } else {
        Ok((lhs.to_string(), None, rhs.to_string()))
    }
}
