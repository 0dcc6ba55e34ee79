//! `data-volt-on-<event>` (base spec §4.7): statement-mode body against
//! `scope ∪ { $event }`, with `.prevent`/`.once` modifiers.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn once_modifier_fires_a_single_time() {
    let container = test_container();
    container.set_inner_html(
        r#"<button data-volt-on-click.once="hits.set(hits.get() + 1)"></button><span data-volt-text="hits"></span>"#,
    );

    let mut vars = HashMap::new();
    vars.insert("hits".to_string(), Value::cell(Value::Number(0.0)));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let button: web_sys::HtmlElement = container.query_selector("button").unwrap().unwrap().dyn_into().unwrap();
    button.click();
    button.click();

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "1");
}
