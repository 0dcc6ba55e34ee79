//! `data-volt-computed:<name>` (base spec §6): a lazily-recomputed
//! derivation visible to the rest of the mount by its (kebab-to-camelCase
//! normalized) name.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn computed_tracks_its_source_cell() {
    let container = test_container();
    container.set_inner_html(
        r#"<button data-volt-on-click="count.set(count.get() + 1)"></button><span data-volt-computed:double-count="count * 2" data-volt-text="doubleCount"></span>"#,
    );

    let mut vars = HashMap::new();
    vars.insert("count".to_string(), Value::cell(Value::Number(1.0)));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "2");

    use wasm_bindgen::JsCast;
    let button: web_sys::HtmlElement = container.query_selector("button").unwrap().unwrap().dyn_into().unwrap();
    button.click();

    assert_eq!(span.text_content().unwrap(), "4");
}
