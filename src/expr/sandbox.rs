//! The security sandbox: identifiers and property names an expression is
//! never allowed to reach, plus the allow-listed globals it may call.
//!
//! Grounded on base spec §4.4's sandbox list. There is no reference
//! implementation for this in the teacher (`sycamore` runs in a trusted
//! build-time/WASM context with no untrusted-string evaluation at all), so
//! this module is enriched from the pack's `other_examples/` material on
//! restricted evaluators rather than adapted from `sycamore_reactive` code.

/// Identifiers that must never resolve, even if a scope happens to define
/// them (defense in depth: a binding context should never define them, but
/// the check lives here so it can't be bypassed by a future scope bug).
const BLOCKED_IDENTIFIERS: &[&str] = &[
    "__proto__",
    "prototype",
    "constructor",
    "Function",
    "eval",
    "window",
    "self",
    "global",
    "globalThis",
    "process",
    "require",
    "import",
    "module",
    "exports",
];

/// Property names that can never be read off any object, closing off
/// prototype-pollution and constructor-escape paths regardless of which
/// identifier they're reached through (e.g. `todos.constructor`).
const BLOCKED_PROPERTIES: &[&str] = &["__proto__", "prototype", "constructor"];

/// Built-in globals an expression may call without the host scope defining
/// them, matching base spec §4.4's allow-list.
pub const SAFE_GLOBALS: &[&str] = &[
    "Array", "Object", "String", "Number", "Boolean", "Date", "Math", "JSON", "RegExp", "Map", "Set",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("access to `{name}` is not permitted in an expression")]
pub struct SandboxViolation {
    pub name: String,
}

pub fn check_identifier(name: &str) -> Result<(), SandboxViolation> {
    if BLOCKED_IDENTIFIERS.contains(&name) {
        Err(SandboxViolation { name: name.to_string() })
    } else {
        Ok(())
    }
}

pub fn check_property(name: &str) -> Result<(), SandboxViolation> {
    if BLOCKED_PROPERTIES.contains(&name) {
        Err(SandboxViolation { name: name.to_string() })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_prototype_escape_identifiers() {
        assert!(check_identifier("window").is_err());
        assert!(check_identifier("eval").is_err());
        assert!(check_identifier("todos").is_ok());
    }

    #[test]
    fn blocks_prototype_escape_properties() {
        assert!(check_property("constructor").is_err());
        assert!(check_property("__proto__").is_err());
        assert!(check_property("length").is_ok());
    }
}
