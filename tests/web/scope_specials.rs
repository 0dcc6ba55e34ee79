//! `$pins`/`$emit` (base spec §4.8/§4.9): the pin registry and
//! root-originated custom event dispatch.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn pin_is_reachable_through_pins() {
    let container = test_container();
    container.set_inner_html(r#"<div data-volt-pin="panel"></div><span data-volt-text="$pins.panel"></span>"#);

    let _handle = mount(ElementHandle::from_web_sys(container.clone()), HashMap::new());

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "[element div]");
}

#[wasm_bindgen_test]
fn emit_dispatches_a_bubbling_custom_event_from_the_root() {
    let container = test_container();
    container.set_inner_html(r#"<button data-volt-on-click="$emit('ping', 42)"></button>"#);

    let _handle = mount(ElementHandle::from_web_sys(container.clone()), HashMap::new());

    let seen = std::rc::Rc::new(std::cell::Cell::new(false));
    let seen_clone = seen.clone();
    let listener = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        seen_clone.set(true);
    });
    container
        .add_event_listener_with_callback("ping", listener.as_ref().unchecked_ref())
        .unwrap();
    listener.forget();

    let button: web_sys::HtmlElement = container.query_selector("button").unwrap().unwrap().dyn_into().unwrap();
    button.click();

    assert!(seen.get());
}
