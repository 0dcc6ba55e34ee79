//! Entry point for the `web` integration test binary (see the `[[test]]`
//! stanza in `Cargo.toml`). Grounded on the teacher's own
//! `tests/web/main.rs` module-declaration-plus-`wasm_bindgen_test_configure`
//! shape.

mod utils;

mod bind_attr;
mod computed;
mod conditional;
mod event;
mod for_loop;
mod model;
mod mount_state;
mod reactive_text;
mod scope_specials;

use wasm_bindgen_test::wasm_bindgen_test_configure;

wasm_bindgen_test_configure!(run_in_browser);
