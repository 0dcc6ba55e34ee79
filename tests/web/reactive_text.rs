//! `data-volt-text` plus `data-volt-on-<event>` driving a counter — the base
//! spec §8 counter scenario, end to end through a live mount.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn clicking_increments_bound_text() {
    let container = test_container();
    container
        .set_inner_html(r#"<button data-volt-on-click="count.set(count.get() + 1)"></button><span data-volt-text="count"></span>"#);

    let mut vars = HashMap::new();
    vars.insert("count".to_string(), Value::cell(Value::Number(0.0)));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "0");

    let button: web_sys::HtmlElement = container.query_selector("button").unwrap().unwrap().dyn_into().unwrap();
    button.click();

    assert_eq!(span.text_content().unwrap(), "1");
}
