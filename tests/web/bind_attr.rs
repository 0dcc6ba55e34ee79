//! `data-volt-bind:<attr>` (base spec §6/§4.7): sets/removes a plain HTML
//! attribute, with `false`/`null`/`undefined` removing it entirely.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn bind_toggles_boolean_attribute() {
    let container = test_container();
    container.set_inner_html(r#"<button data-volt-bind:disabled="locked"></button>"#);

    let mut vars = HashMap::new();
    vars.insert("locked".to_string(), Value::cell(Value::Bool(true)));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let button = container.query_selector("button").unwrap().unwrap();
    assert_eq!(button.get_attribute("disabled"), Some(String::new()));
}

#[wasm_bindgen_test]
fn bind_removes_attribute_for_false() {
    let container = test_container();
    container.set_inner_html(r#"<button data-volt-bind:disabled="locked"></button>"#);

    let mut vars = HashMap::new();
    vars.insert("locked".to_string(), Value::cell(Value::Bool(false)));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let button = container.query_selector("button").unwrap().unwrap();
    assert!(button.get_attribute("disabled").is_none());
}
