//! `data-volt-computed:<name>`: creates a derivation named `<name>`
//! (kebab-case normalized to camelCase) in the bound scope, computed from
//! the attribute's expression (base spec §6). Lazy like any other
//! [`crate::reactive::Derivation`]: nothing recomputes until something reads
//! the name.

use crate::error;
use crate::expr::Value;

use super::{eval, BindContext, Teardown};

pub fn bind(ctx: &BindContext) -> Result<Teardown, crate::error::VoltError> {
    let Some(raw_name) = ctx.directive.arg.clone() else {
        return Err(crate::error::VoltError::InvalidBinding {
            attribute: "computed".to_string(),
            reason: "missing derivation name, expected data-volt-computed:<name>".to_string(),
        });
    };
    let name = kebab_to_camel(&raw_name);
    let scope = ctx.scope.clone();
    let src = ctx.value.to_string();

    let derivation = Value::derivation(move || match eval(&src, &scope) {
        Ok(value) => value,
        Err(err) => {
            error::report(err);
            Value::Undefined
        }
    });
    ctx.scope.define(name, derivation);
    Ok(Box::new(|| {}))
}

/// `double-count` -> `doubleCount`, per base spec §4.7's "kebab-case-to-
/// camelCase normalized" rule.
fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_kebab_case() {
        assert_eq!(kebab_to_camel("double-count"), "doubleCount");
        assert_eq!(kebab_to_camel("count"), "count");
        assert_eq!(kebab_to_camel("a-b-c"), "aBC");
    }
}
