//! `data-volt-model` (base spec §4.7): two-way binding, including the
//! kebab-case-to-camelCase named-cell fallback.

use std::collections::HashMap;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn model_writes_input_value_back_to_cell() {
    let container = test_container();
    container.set_inner_html(
        r#"<input data-volt-model="name"><span data-volt-text="name"></span>"#,
    );

    let mut vars = HashMap::new();
    let name_cell = Value::cell(Value::String(std::rc::Rc::from("")));
    vars.insert("name".to_string(), name_cell);
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let input: web_sys::HtmlInputElement = container.query_selector("input").unwrap().unwrap().dyn_into().unwrap();
    input.set_value("Ada");
    let event = web_sys::Event::new("input").unwrap();
    input.dispatch_event(&event).unwrap();

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "Ada");
}

#[wasm_bindgen_test]
fn model_falls_back_to_camel_case_cell_name() {
    let container = test_container();
    container.set_inner_html(
        r#"<input data-volt-model="user-name"><span data-volt-text="userName"></span>"#,
    );

    let mut vars = HashMap::new();
    vars.insert("userName".to_string(), Value::cell(Value::String(std::rc::Rc::from(""))));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let input: web_sys::HtmlInputElement = container.query_selector("input").unwrap().unwrap().dyn_into().unwrap();
    input.set_value("Grace");
    let event = web_sys::Event::new("input").unwrap();
    input.dispatch_event(&event).unwrap();

    let span = container.query_selector("span").unwrap().unwrap();
    assert_eq!(span.text_content().unwrap(), "Grace");
}
