//! `data-volt-on-<event>`: attaches a native listener. The body runs in
//! statement mode against `scope ∪ { $event }`; if it evaluates to a
//! function, that function is additionally called with the event (so both
//! `count++` and `handleClick($event)` work as handler bodies).

use wasm_bindgen::JsCast;

use crate::error;
use crate::expr::Value;

use super::{eval_stmts, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let Some(event_name) = ctx.directive.arg.clone() else {
        return Err(crate::error::VoltError::InvalidBinding {
            attribute: "on".to_string(),
            reason: "missing event name, expected data-volt-on-<event>".to_string(),
        });
    };
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();
    let modifiers = ctx.directive.modifiers.clone();
    let element = ctx.element.clone();

    // `.window`/`.document` retarget the listener to that global object
    // (base spec §4.7's modifier table) rather than the bound element itself.
    let global_target = if modifiers.window() {
        Some(crate::dom::GlobalTarget::Window)
    } else if modifiers.document() {
        Some(crate::dom::GlobalTarget::Document)
    } else {
        None
    };

    let self_only = modifiers.self_only();
    let prevent = modifiers.prevent();
    let stop = modifiers.stop();
    let once = modifiers.once();
    let passive = modifiers.passive();
    let debounce_ms = modifiers.debounce_ms;
    let throttle_ms = modifiers.throttle_ms;

    let timer: std::rc::Rc<std::cell::Cell<Option<i32>>> = std::rc::Rc::new(std::cell::Cell::new(None));
    let last_run: std::rc::Rc<std::cell::Cell<f64>> = std::rc::Rc::new(std::cell::Cell::new(f64::NEG_INFINITY));

    let listen_element = element.clone();
    let teardown_timer = timer.clone();
    let handler = move |event: web_sys::Event| {
        if self_only {
            let target_is_self = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .map(|t| t.is_same_node(Some(element.as_web_sys())))
                .unwrap_or(false);
            if !target_is_self {
                return;
            }
        }
        if prevent {
            event.prevent_default();
        }
        if stop {
            event.stop_propagation();
        }

        let event_value = crate::dom::event_to_value(&event);
        let scope = scope.clone();
        let src = src.clone();
        let run = move || run_handler(&src, &scope, event_value.clone());

        if let Some(ms) = debounce_ms {
            if let Some(handle) = timer.take() {
                crate::dom::cancel_timeout(handle);
            }
            let timer = timer.clone();
            let handle = crate::dom::set_timeout(ms, move || {
                timer.set(None);
                run();
            });
            timer.set(Some(handle));
        } else if let Some(ms) = throttle_ms {
            let now = crate::dom::now_ms();
            if now - last_run.get() >= ms as f64 {
                last_run.set(now);
                run();
            }
        } else {
            run();
        }
    };

    let remove_listener = match global_target {
        Some(which) => {
            let target = crate::dom::global_event_target(which);
            crate::dom::add_event_listener_to(&target, &event_name, once, passive, handler)
        }
        None => listen_element.add_event_listener(&event_name, once, passive, handler),
    };

    Ok(Box::new(move || {
        remove_listener();
        if let Some(handle) = teardown_timer.take() {
            crate::dom::cancel_timeout(handle);
        }
    }))
}

fn run_handler(src: &str, scope: &crate::scope::Scope, event: Value) {
    let scope = scope.extend_with_event(event.clone());
    match eval_stmts(src, &scope) {
        Ok(Value::Function(f)) => {
            f(&[event]);
        }
        Ok(_) => {}
        Err(err) => {
            error::report(err);
        }
    }
}
