//! `data-volt-state` JSON seeding, `data-volt-skip`, and `data-volt-cloak`
//! (base spec §6).

use std::collections::HashMap;

use volt_core::{mount, ElementHandle};
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn state_attribute_seeds_root_scope_cells() {
    let container = test_container();
    container.set_attribute("data-volt-state", r#"{"count": 3}"#).unwrap();
    container.set_inner_html(r#"<span data-volt-text="count"></span>"#);

    let _handle = mount(ElementHandle::from_web_sys(container.clone()), HashMap::new());

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "3");
}

#[wasm_bindgen_test]
fn explicit_vars_override_state_on_collision() {
    let container = test_container();
    container.set_attribute("data-volt-state", r#"{"count": 3}"#).unwrap();
    container.set_inner_html(r#"<span data-volt-text="count"></span>"#);

    let mut vars = HashMap::new();
    vars.insert("count".to_string(), volt_core::Value::Number(9.0));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "9");
}

#[wasm_bindgen_test]
fn skip_attribute_leaves_subtree_unbound() {
    let container = test_container();
    container.set_inner_html(
        r#"<div data-volt-skip><span data-volt-text="missing"></span></div>"#,
    );

    let _handle = mount(ElementHandle::from_web_sys(container.clone()), HashMap::new());

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "");
}

#[wasm_bindgen_test]
fn cloak_attribute_is_removed_once_bound() {
    let container = test_container();
    container.set_inner_html(r#"<div data-volt-cloak data-volt-text="'ready'"></div>"#);

    let _handle = mount(ElementHandle::from_web_sys(container.clone()), HashMap::new());

    let div = container.query_selector("div").unwrap().unwrap();
    assert!(div.get_attribute("data-volt-cloak").is_none());
    assert_eq!(div.text_content().unwrap(), "ready");
}
