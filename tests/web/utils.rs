//! Shared helpers for the `tests/web` suite. Grounded on the teacher's own
//! `tests/web/utils.rs`/`main.rs` test-container idiom: one persistent
//! `<div>` reused by every test, cleared at the start of each so tests don't
//! bleed into each other's DOM state.

use web_sys::{Document, Element, Window};

pub fn window() -> Window {
    web_sys::window().expect("no window")
}

pub fn document() -> Document {
    window().document().expect("no document")
}

/// Returns the test container, freshly emptied.
pub fn test_container() -> Element {
    if document().query_selector("#volt-test-container").unwrap().is_none() {
        document()
            .body()
            .unwrap()
            .insert_adjacent_html("beforeend", r#"<div id="volt-test-container"></div>"#)
            .unwrap();
    }
    let container = document().query_selector("#volt-test-container").unwrap().unwrap();
    container.set_inner_html("");
    container
}
