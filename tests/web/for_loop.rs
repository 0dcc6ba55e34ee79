//! `data-volt-for` (base spec §4.7): `ident in expr`, full rebuild on every
//! change (no keyed diffing, by design — see `DESIGN.md`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use volt_core::{mount, ElementHandle, Value};
use wasm_bindgen_test::wasm_bindgen_test;

use crate::utils::test_container;

#[wasm_bindgen_test]
fn for_renders_one_element_per_item() {
    let container = test_container();
    container.set_inner_html(r#"<ul><li data-volt-for="item in items" data-volt-text="item"></li></ul>"#);

    let items = Rc::new(RefCell::new(vec![
        Value::String(std::rc::Rc::from("a")),
        Value::String(std::rc::Rc::from("b")),
        Value::String(std::rc::Rc::from("c")),
    ]));
    let mut vars = HashMap::new();
    vars.insert("items".to_string(), Value::Array(items));
    let _handle = mount(ElementHandle::from_web_sys(container.clone()), vars);

    let list = container.query_selector_all("li").unwrap();
    assert_eq!(list.length(), 3);
    assert_eq!(list.item(0).unwrap().text_content().unwrap(), "a");
    assert_eq!(list.item(2).unwrap().text_content().unwrap(), "c");
}
