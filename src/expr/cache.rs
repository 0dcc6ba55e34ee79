//! Process-wide compile cache: the same attribute text is re-evaluated on
//! every reactive update, so parsing it once per element (not once per
//! update) matters for anything with a `for` loop over more than a handful
//! of items. Grounded on `sycamore_reactive`'s habit of thread-local caches
//! for anything that would otherwise be recomputed inside a hot reactive
//! path (see the teacher's scope-local arena pattern in `root.rs`).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::ast::Program;
use super::parser::{self, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalMode {
    Expression,
    Statements,
}

thread_local! {
    static CACHE: RefCell<HashMap<(String, EvalMode), Rc<Program>>> = RefCell::new(HashMap::new());
}

/// Parse `src` under `mode`, reusing a cached [`Program`] if this exact
/// source text has been compiled before on this thread.
pub fn compile(src: &str, mode: EvalMode) -> Result<Rc<Program>, ParseError> {
    let key = (src.to_string(), mode);
    if let Some(hit) = CACHE.with(|c| c.borrow().get(&key).cloned()) {
        return Ok(hit);
    }
    let program = match mode {
        EvalMode::Expression => Program::Expression(parser::parse_expression(src)?),
        EvalMode::Statements => Program::Statements(parser::parse_statements(src)?),
    };
    let program = Rc::new(program);
    CACHE.with(|c| c.borrow_mut().insert(key, program.clone()));
    Ok(program)
}

/// Drop every cached program. Exposed for tests and for long-lived hosts
/// (e.g. a dev-mode hot reload) that want to force recompilation after
/// template text changes out from under the cache key.
pub fn clear() {
    CACHE.with(|c| c.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_identical_source_by_pointer_equality() {
        clear();
        let a = compile("count + 1", EvalMode::Expression).unwrap();
        let b = compile("count + 1", EvalMode::Expression).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinguishes_modes_for_the_same_text() {
        clear();
        let expr = compile("count", EvalMode::Expression).unwrap();
        let stmt = compile("count", EvalMode::Statements).unwrap();
        assert!(matches!(*expr, Program::Expression(_)));
        assert!(matches!(*stmt, Program::Statements(_)));
    }
}
