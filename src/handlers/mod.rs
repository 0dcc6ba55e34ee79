//! The built-in directive handlers (base spec §4.6) plus plugin dispatch for
//! anything outside that set. Every handler shares the same shape: given a
//! bound element, the active scope, and an already-parsed directive name, it
//! wires up whatever reactivity or one-shot behavior the directive calls
//! for, and returns a teardown closure the binder runs on unmount.
//!
//! Grounded on `sycamore_reactive`'s own `Effect`: every reactive handler
//! (`text`, `html`, `class`, `show`, `style`, `attr`) is nothing more than an
//! [`crate::reactive::Effect`] whose body evaluates an expression and pushes
//! the result into the DOM — dependency tracking falls out of the tracking
//! guard the effect already opens, with no additional bookkeeping here.

pub mod attr;
pub mod class;
pub mod computed;
pub mod conditional;
pub mod event;
pub mod for_loop;
pub mod html;
pub mod init;
pub mod model;
pub mod pin;
pub mod plugin;
pub mod show;
pub mod style;
pub mod text;

use crate::dom::attr::DirectiveName;
use crate::dom::ElementHandle;
use crate::error::VoltError;
use crate::scope::Scope;

/// Disposer run on unmount. Every handler returns one, even if it is a no-op
/// (`init` has nothing to clean up; `Box::new(|| {})` costs nothing).
pub type Teardown = Box<dyn FnOnce()>;

/// Shared arguments every handler needs. `value` is the attribute's raw text
/// (the expression or statement source, or the pin name for `pin`).
pub struct BindContext<'a> {
    pub element: &'a ElementHandle,
    pub scope: &'a Scope,
    pub directive: &'a DirectiveName,
    pub value: &'a str,
}

/// Evaluate `src` as an expression against `scope`, mapping any failure into
/// [`VoltError::Evaluation`] — the common path every value-producing handler
/// goes through.
pub(crate) fn eval(src: &str, scope: &Scope) -> Result<crate::expr::Value, VoltError> {
    crate::expr::evaluate_expression(src, scope).map_err(|cause| VoltError::Evaluation {
        expr: src.to_string(),
        cause: cause.to_string(),
    })
}

/// Same, for statement-mode bodies (`on-*`, `init`).
pub(crate) fn eval_stmts(src: &str, scope: &Scope) -> Result<crate::expr::Value, VoltError> {
    crate::expr::evaluate_statements(src, scope).map_err(|cause| VoltError::Evaluation {
        expr: src.to_string(),
        cause: cause.to_string(),
    })
}

/// Dispatch one directive to its handler. Unknown directives fall through to
/// the plugin registry, then to [`VoltError::UnknownDirective`].
pub fn dispatch(ctx: &BindContext) -> Result<Teardown, VoltError> {
    match ctx.directive.base.as_str() {
        "text" => text::bind(ctx),
        "html" => html::bind(ctx),
        "class" => class::bind(ctx),
        "show" => show::bind(ctx),
        "style" => style::bind(ctx),
        "bind" => attr::bind(ctx),
        "model" => model::bind(ctx),
        "on" => event::bind(ctx),
        "init" => init::bind(ctx),
        "pin" => pin::bind(ctx),
        "computed" => computed::bind(ctx),
        // "if"/"else"/"for" are structural and dispatched directly by the
        // binder before the rest of an element's directives, not through
        // this table (see `crate::binder::bind_candidate`).
        other => plugin::dispatch(other, ctx),
    }
}
