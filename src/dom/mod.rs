//! DOM access layer: a thin [`ElementHandle`] wrapper over `web_sys`, plus
//! [`attr`] (attribute-name parsing) and [`walker`] (document-order
//! traversal). Mirrors the shape of `sycamore_web::web_node::dom::DomNode` —
//! a small owned wrapper around the raw `web_sys` type with the handful of
//! operations the rest of the crate actually needs — but talks in terms of
//! `data-volt-*` bindings rather than a virtual node tree, since base spec §2
//! rules out diff-based rendering entirely.

pub mod attr;
pub mod walker;

use std::fmt;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::expr::Value;

/// A cheaply-cloned handle to a live DOM element. Identity (`==`, `Hash`) is
/// the underlying element's identity, not structural.
#[derive(Clone)]
pub struct ElementHandle(Rc<web_sys::Element>);

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.is_same_node(Some(&other.0))
    }
}
impl Eq for ElementHandle {}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementHandle({})", self.0.tag_name())
    }
}

impl ElementHandle {
    pub fn from_web_sys(el: web_sys::Element) -> Self {
        ElementHandle(Rc::new(el))
    }

    pub fn as_web_sys(&self) -> &web_sys::Element {
        &self.0
    }

    pub fn tag_name(&self) -> String {
        self.0.tag_name().to_lowercase()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    pub fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    /// All attributes present on the element right now, snapshotted (used by
    /// the binder to enumerate `data-volt-*` bindings without the live
    /// `NamedNodeMap` shifting under a concurrent mutation).
    pub fn attributes(&self) -> Vec<(String, String)> {
        let map = self.0.attributes();
        let len = map.length();
        let mut out = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(attr) = map.item(i) {
                out.push((attr.name(), attr.value()));
            }
        }
        out
    }

    pub fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    pub fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    pub fn set_style_property(&self, prop: &str, value: &str) {
        if let Some(html_el) = self.0.dyn_ref::<web_sys::HtmlElement>() {
            let _ = html_el.style().set_property(prop, value);
        }
    }

    pub fn remove_style_property(&self, prop: &str) {
        if let Some(html_el) = self.0.dyn_ref::<web_sys::HtmlElement>() {
            let _ = html_el.style().remove_property(prop);
        }
    }

    pub fn set_display_none(&self, hidden: bool) {
        if hidden {
            self.set_style_property("display", "none");
        } else {
            self.remove_style_property("display");
        }
    }

    pub fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    pub fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    /// The control's current value: `value` for text-like inputs and
    /// `<select>`, `checked` coerced to `"true"`/`"false"` for checkboxes —
    /// used by `model` to read back user input (base spec §4.8).
    pub fn form_value(&self) -> FormValue {
        if let Some(input) = self.0.dyn_ref::<web_sys::HtmlInputElement>() {
            match input.type_().as_str() {
                "checkbox" => FormValue::Bool(input.checked()),
                "number" | "range" => FormValue::Text(input.value()),
                _ => FormValue::Text(input.value()),
            }
        } else if let Some(select) = self.0.dyn_ref::<web_sys::HtmlSelectElement>() {
            FormValue::Text(select.value())
        } else if let Some(textarea) = self.0.dyn_ref::<web_sys::HtmlTextAreaElement>() {
            FormValue::Text(textarea.value())
        } else {
            FormValue::Text(self.0.text_content().unwrap_or_default())
        }
    }

    pub fn set_form_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<web_sys::HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = self.0.dyn_ref::<web_sys::HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(textarea) = self.0.dyn_ref::<web_sys::HtmlTextAreaElement>() {
            textarea.set_value(value);
        }
    }

    pub fn set_form_checked(&self, checked: bool) {
        if let Some(input) = self.0.dyn_ref::<web_sys::HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    pub fn children(&self) -> Vec<ElementHandle> {
        let list = self.0.children();
        let len = list.length();
        let mut out = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(child) = list.item(i) {
                out.push(ElementHandle::from_web_sys(child));
            }
        }
        out
    }

    pub fn parent(&self) -> Option<ElementHandle> {
        self.0.parent_element().map(ElementHandle::from_web_sys)
    }

    pub fn next_element_sibling(&self) -> Option<ElementHandle> {
        self.0.next_element_sibling().map(ElementHandle::from_web_sys)
    }

    /// A deep clone of this element, detached from the document — the
    /// instantiation step `if`/`for` run every time they mount a fresh copy
    /// of their stashed template.
    pub fn clone_node_deep(&self) -> ElementHandle {
        let cloned = self
            .0
            .clone_node_with_deep(true)
            .expect("clone_node_with_deep is infallible for a live element")
            .unchecked_into::<web_sys::Element>();
        ElementHandle::from_web_sys(cloned)
    }

    /// Dispatch a `CustomEvent` named `name` carrying `detail`, bubbling —
    /// the implementation behind `$emit` (base spec §4.9).
    pub fn dispatch_custom_event(&self, name: &str, detail: &Value) {
        let init = web_sys::CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&to_js_value(detail));
        if let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(name, &init) {
            let _ = self.0.dispatch_event(&event);
        }
    }

    /// Register a native event listener, returning a disposer. Modifier
    /// handling (`prevent`/`stop`/`self`/`once`/`passive`/`window`/`document`)
    /// is the caller's responsibility (`handlers::event`); this just wires the
    /// closure up with the browser-level `once`/`passive` options, which the
    /// DOM itself enforces more cheaply than userspace code could.
    pub fn add_event_listener(
        &self,
        event_name: &str,
        once: bool,
        passive: bool,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Box<dyn FnOnce()> {
        let target: &web_sys::EventTarget = &self.0;
        add_event_listener_to(target, event_name, once, passive, callback)
    }
}

/// The global `EventTarget` a `.window`/`.document` modifier retargets a
/// listener to (base spec §4.7's modifier table). Panics if called outside a
/// browser document, same as every other `web_sys::window()` call site in
/// this module.
pub fn global_event_target(which: GlobalTarget) -> web_sys::EventTarget {
    let window = web_sys::window().expect("window must exist to bind a `.window`/`.document` listener");
    match which {
        GlobalTarget::Window => window.into(),
        GlobalTarget::Document => window.document().expect("document must exist").into(),
    }
}

/// Which global object a `.window`/`.document` modifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalTarget {
    Window,
    Document,
}

/// Register a native listener on any `EventTarget` — an element, `window`, or
/// `document` — returning a disposer. Shared by [`ElementHandle::add_event_listener`]
/// and the `.window`/`.document` modifier path in `handlers::event`.
pub fn add_event_listener_to(
    target: &web_sys::EventTarget,
    event_name: &str,
    once: bool,
    passive: bool,
    mut callback: impl FnMut(web_sys::Event) + 'static,
) -> Box<dyn FnOnce()> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| callback(e));
    let options = web_sys::AddEventListenerOptions::new();
    options.set_once(once);
    options.set_passive(passive);
    let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        event_name,
        closure.as_ref().unchecked_ref(),
        &options,
    );
    let target = target.clone();
    let event_name = event_name.to_string();
    Box::new(move || {
        let _ = target.remove_event_listener_with_callback(&event_name, closure.as_ref().unchecked_ref());
        drop(closure);
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Bool(bool),
}

impl From<ElementHandle> for Value {
    fn from(el: ElementHandle) -> Value {
        Value::Element(el)
    }
}

fn to_js_value(value: &Value) -> JsValue {
    match value.unwrap_tracked() {
        Value::Undefined => JsValue::UNDEFINED,
        Value::Null => JsValue::NULL,
        Value::Bool(b) => JsValue::from_bool(b),
        Value::Number(n) => JsValue::from_f64(n),
        Value::String(s) => JsValue::from_str(&s),
        other => JsValue::from_str(&other.to_display_string()),
    }
}

/// Schedule `f` to run on the microtask queue, after the current DOM update
/// finishes — the implementation behind `$defer` (base spec §4.9).
pub fn defer(f: impl FnOnce() + 'static) {
    use wasm_bindgen::prelude::*;
    let once = std::cell::Cell::new(Some(f));
    let closure = Closure::once_into_js(move || {
        if let Some(f) = once.take() {
            f();
        }
    });
    if let Some(window) = web_sys::window() {
        let _ = window.queue_microtask(closure.unchecked_ref());
    }
}

/// Build the `$event` value a handler body sees: an object exposing `type`
/// and, when the target is an element, `target`.
pub fn event_to_value(event: &web_sys::Event) -> Value {
    let mut entries = vec![("type".to_string(), Value::String(Rc::from(event.type_().as_str())))];
    if let Some(target) = event.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
        entries.push(("target".to_string(), Value::from(ElementHandle::from_web_sys(target))));
    }
    Value::Object(Rc::new(std::cell::RefCell::new(entries)))
}

/// Schedule `f` to run after `ms` milliseconds via `setTimeout`, returning
/// the handle `cancel_timeout` expects.
pub fn set_timeout(ms: u32, f: impl FnOnce() + 'static) -> i32 {
    let closure = Closure::once_into_js(f);
    web_sys::window()
        .and_then(|w| w.set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), ms as i32).ok())
        .unwrap_or(0)
}

pub fn cancel_timeout(handle: i32) {
    if let Some(w) = web_sys::window() {
        w.clear_timeout_with_handle(handle);
    }
}

/// Milliseconds since the navigation start, via `performance.now()`, used to
/// implement `.throttle` modifiers.
pub fn now_ms() -> f64 {
    web_sys::window().and_then(|w| w.performance()).map(|p| p.now()).unwrap_or(0.0)
}
