//! `data-volt-if`/`data-volt-else` (base spec §4.7): swaps the whole
//! subtree, tearing down the losing branch's bindings rather than merely
//! hiding it.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn if_without_else_renders_nothing_when_false() {
    let container = test_container();
    container.set_inner_html(r#"<p data-volt-if="show">visible</p>"#);

    let mut vars = HashMap::new();
    vars.insert("show".to_string(), Value::Bool(false));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    assert!(container.query_selector("p").unwrap().is_none());
}

#[wasm_bindgen_test]
fn if_else_picks_the_matching_branch() {
    let container = test_container();
    container.set_inner_html(
        r#"<p data-volt-if="show">yes</p><p data-volt-else>no</p>"#,
    );

    let mut vars = HashMap::new();
    vars.insert("show".to_string(), Value::Bool(false));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let p = container.query_selector("p").unwrap().unwrap();
    assert_eq!(p.text_content().unwrap(), "no");
}
