//! Parsing for `data-volt-*` attribute names: namespace stripping, directive
//! base/argument splitting, and modifier-list parsing (base spec §4.5).
//!
//! There is no teacher precedent for this (sycamore has no string-attribute
//! DSL at all — view trees are built by macros at compile time), so this
//! module is grounded in the pack's `other_examples/` material on
//! attribute-driven declarative bindings rather than adapted sycamore code,
//! kept in the teacher's small-hand-rolled-parser style (see [`crate::expr::lexer`]).

use std::collections::HashSet;

/// The fixed set of built-in directive base names. Anything else is
/// dispatched to a registered plugin, or reported as
/// [`crate::error::VoltError::UnknownDirective`] if none is registered.
pub const BUILTIN_DIRECTIVES: &[&str] =
    &["text", "html", "class", "show", "style", "bind", "model", "on", "init", "pin", "if", "else", "for", "computed"];

/// Directive bases whose argument is separated by `:` rather than `-`
/// (base spec §6: `data-volt-bind:<attr>`, `data-volt-computed:<name>`).
const COLON_ARG_DIRECTIVES: &[&str] = &["bind", "computed"];

/// One parsed `data-volt-*` attribute name: `data-volt-<base>[-<arg>][.modifier]*`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveName {
    pub base: String,
    pub arg: Option<String>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    flags: HashSet<&'static str>,
    pub debounce_ms: Option<u32>,
    pub throttle_ms: Option<u32>,
}

const FLAG_MODIFIERS: &[&str] = &["prevent", "stop", "self", "window", "document", "once", "passive", "number", "trim", "lazy"];

impl Modifiers {
    pub fn has(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
    pub fn prevent(&self) -> bool {
        self.has("prevent")
    }
    pub fn stop(&self) -> bool {
        self.has("stop")
    }
    pub fn self_only(&self) -> bool {
        self.has("self")
    }
    pub fn window(&self) -> bool {
        self.has("window")
    }
    pub fn document(&self) -> bool {
        self.has("document")
    }
    pub fn once(&self) -> bool {
        self.has("once")
    }
    pub fn passive(&self) -> bool {
        self.has("passive")
    }
    pub fn number(&self) -> bool {
        self.has("number")
    }
    pub fn trim(&self) -> bool {
        self.has("trim")
    }
    pub fn lazy(&self) -> bool {
        self.has("lazy")
    }
}

/// `true` if `name` starts with the configured attribute prefix (default
/// `data-volt-`, see [`crate::config::VoltConfig`]).
pub fn is_volt_attribute(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix)
}

/// Parse a full attribute name (already confirmed to start with `prefix`)
/// into base directive, optional argument, and modifier list.
pub fn parse_directive(name: &str, prefix: &str) -> DirectiveName {
    let rest = &name[prefix.len()..];
    let mut segments = rest.split('.');
    let head = segments.next().unwrap_or("");
    let (base, arg) = split_base_arg(head);

    let mut modifiers = Modifiers::default();
    let mut pending_numeric: Option<&str> = None;
    for seg in segments {
        if let Some(kind) = pending_numeric.take() {
            if let Ok(n) = seg.parse::<u32>() {
                match kind {
                    "debounce" => modifiers.debounce_ms = Some(n),
                    "throttle" => modifiers.throttle_ms = Some(n),
                    _ => unreachable!(),
                }
                continue;
            }
        }
        match seg {
            "debounce" => {
                modifiers.debounce_ms = Some(250); // default per base spec §4.5 if no explicit ms follows
                pending_numeric = Some("debounce");
            }
            "throttle" => {
                modifiers.throttle_ms = Some(250);
                pending_numeric = Some("throttle");
            }
            flag if FLAG_MODIFIERS.contains(&flag) => {
                modifiers.flags.insert(flag);
            }
            _ => {} // unknown modifier segment: ignored, not fatal
        }
    }

    DirectiveName { base, arg, modifiers }
}

fn split_base_arg(head: &str) -> (String, Option<String>) {
    if let Some((base, arg)) = head.split_once(':') {
        if COLON_ARG_DIRECTIVES.contains(&base) && !arg.is_empty() {
            return (base.to_string(), Some(arg.to_string()));
        }
    }

    let mut candidates: Vec<&&str> = BUILTIN_DIRECTIVES.iter().collect();
    candidates.sort_by_key(|b| std::cmp::Reverse(b.len()));
    for base in candidates {
        if head == *base {
            return (base.to_string(), None);
        }
        if let Some(rest) = head.strip_prefix(base) {
            if let Some(arg) = rest.strip_prefix('-') {
                if !arg.is_empty() {
                    return (base.to_string(), Some(arg.to_string()));
                }
            }
        }
    }
    // Not a known builtin: the whole head is the (plugin) directive name,
    // with no argument — plugins define their own argument grammar, if any,
    // by parsing `arg` out of their own handler.
    (head.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_base_and_argument() {
        let d = parse_directive("data-volt-on-click", "data-volt-");
        assert_eq!(d.base, "on");
        assert_eq!(d.arg.as_deref(), Some("click"));
    }

    #[test]
    fn splits_colon_argument_directives() {
        let bind = parse_directive("data-volt-bind:disabled", "data-volt-");
        assert_eq!(bind.base, "bind");
        assert_eq!(bind.arg.as_deref(), Some("disabled"));

        let computed = parse_directive("data-volt-computed:double-count", "data-volt-");
        assert_eq!(computed.base, "computed");
        assert_eq!(computed.arg.as_deref(), Some("double-count"));
    }

    #[test]
    fn parses_flag_modifiers() {
        let d = parse_directive("data-volt-on-click.prevent.stop", "data-volt-");
        assert!(d.modifiers.prevent());
        assert!(d.modifiers.stop());
        assert!(!d.modifiers.once());
    }

    #[test]
    fn parses_debounce_with_explicit_ms() {
        let d = parse_directive("data-volt-model-value.debounce.300", "data-volt-");
        assert_eq!(d.base, "model");
        assert_eq!(d.arg.as_deref(), Some("value"));
        assert_eq!(d.modifiers.debounce_ms, Some(300));
    }

    #[test]
    fn debounce_without_explicit_ms_uses_default() {
        let d = parse_directive("data-volt-model.debounce", "data-volt-");
        assert_eq!(d.modifiers.debounce_ms, Some(250));
    }

    #[test]
    fn unknown_directive_keeps_full_head_as_base() {
        let d = parse_directive("data-volt-my-plugin", "data-volt-");
        assert_eq!(d.base, "my-plugin");
        assert_eq!(d.arg, None);
    }

    #[test]
    fn no_arg_builtin_parses_cleanly() {
        let d = parse_directive("data-volt-show", "data-volt-");
        assert_eq!(d.base, "show");
        assert_eq!(d.arg, None);
    }
}
