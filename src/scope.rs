//! [`Scope`]: the identifier environment expressions evaluate against (base
//! spec §4.3), plus the `$`-prefixed special variables every binding body
//! can reach (`$el`, `$event`, `$pins`, `$uid`, `$emit`, `$probe`, `$defer`).
//!
//! Grounded on `sycamore_reactive`'s scope-as-persistent-chain idiom
//! (`BoundedScope`'s parent pointer in the teacher's arena-lifetime
//! generation), reworked here as a plain `Rc` chain of immutable frames:
//! extending a scope (entering a `for` iteration, an event handler) never
//! mutates the parent, it allocates a child frame that shadows identifiers
//! and falls through to the parent for everything else.
//!
//! `ScopeMetadata` (origin element, pin registry, uid counter) is embedded
//! directly in the scope frame rather than kept in a side weak-map: base
//! spec §4.3 only requires metadata to live exactly as long as the scope
//! that owns it, and embedding it in the same `Rc` achieves that for free
//! without the indirection a weak-keyed table would add.

use std::cell::{Cell as StdCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::ElementHandle;
use crate::expr::{Environment, Value};

struct ScopeFrame {
    vars: RefCell<HashMap<String, Value>>,
    parent: Option<Scope>,
    /// The element this frame's metadata is attached to. `None` for
    /// synthetic frames extended purely for variable shadowing (e.g. a
    /// `for` iteration frame reuses its loop root's metadata).
    origin: Option<ElementHandle>,
    pins: RefCell<HashMap<String, ElementHandle>>,
    uid_counter: StdCell<u64>,
    /// Set while this frame is the active frame for an event handler body,
    /// so `$event` resolves; `None` everywhere else.
    event: RefCell<Option<Value>>,
}

/// An immutable-from-the-outside identifier environment, chained to a
/// parent. Cloning a `Scope` is cheap (one `Rc` bump) and aliases the same
/// frame.
#[derive(Clone)]
pub struct Scope(Rc<ScopeFrame>);

impl Scope {
    /// A fresh root scope for a mount point, with no parent.
    pub fn root(origin: ElementHandle) -> Scope {
        Scope(Rc::new(ScopeFrame {
            vars: RefCell::new(HashMap::new()),
            parent: None,
            origin: Some(origin),
            pins: RefCell::new(HashMap::new()),
            uid_counter: StdCell::new(0),
            event: RefCell::new(None),
        }))
    }

    /// A child scope shadowing `vars` over `self` (e.g. a `for` iteration's
    /// item/index bindings, or an event handler's `$event`).
    pub fn extend(&self, vars: HashMap<String, Value>) -> Scope {
        Scope(Rc::new(ScopeFrame {
            vars: RefCell::new(vars),
            parent: Some(self.clone()),
            origin: None,
            pins: RefCell::new(HashMap::new()),
            uid_counter: StdCell::new(0),
            event: RefCell::new(None),
        }))
    }

    /// A child scope carrying `$event` for the duration of one handler
    /// invocation.
    pub fn extend_with_event(&self, event: Value) -> Scope {
        let child = self.extend(HashMap::new());
        *child.0.event.borrow_mut() = Some(event);
        child
    }

    /// Define or shadow `name` in this exact frame (not a parent).
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.vars.borrow_mut().insert(name.into(), value);
    }

    fn lookup_var(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.0.vars.borrow().get(name) {
            return Some(v.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.lookup_var(name))
    }

    fn nearest_origin(&self) -> Option<ElementHandle> {
        self.0.origin.clone().or_else(|| self.0.parent.as_ref().and_then(|p| p.nearest_origin()))
    }

    fn nearest_event(&self) -> Option<Value> {
        if let Some(e) = self.0.event.borrow().as_ref() {
            return Some(e.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.nearest_event())
    }

    /// Root scope for pin registration: pins are visible to the whole mount
    /// subtree, so they live on the root frame rather than the nearest one.
    fn root_frame(&self) -> &Rc<ScopeFrame> {
        match &self.0.parent {
            Some(p) => p.root_frame(),
            None => &self.0,
        }
    }

    /// Register `name` as a pinned reference to `el` (`data-volt-pin`),
    /// visible to the whole mount subtree via `$pins`.
    pub fn register_pin(&self, name: impl Into<String>, el: ElementHandle) {
        self.root_frame().pins.borrow_mut().insert(name.into(), el);
    }

    pub fn pin(&self, name: &str) -> Option<ElementHandle> {
        self.root_frame().pins.borrow().get(name).cloned()
    }

    /// The next value in this mount's `$uid` counter, monotonically
    /// increasing and never reused, for handlers that need a stable unique
    /// id (e.g. generating `id`/`for` attribute pairs for form controls).
    pub fn next_uid(&self) -> u64 {
        let root = self.root_frame();
        let next = root.uid_counter.get();
        root.uid_counter.set(next + 1);
        next
    }

    /// `$pins` — a read-through snapshot of the pin registry, rebuilt on
    /// every access since pins may be registered after this scope was
    /// created but before it is read.
    fn pins_snapshot(&self) -> Value {
        let entries = self
            .root_frame()
            .pins
            .borrow()
            .iter()
            .map(|(name, el)| (name.clone(), Value::from(el.clone())))
            .collect();
        Value::Object(Rc::new(RefCell::new(entries)))
    }

    /// `$uid(prefix?)` — `"volt-{n}"`, or `"volt-{prefix}-{n}"` if a prefix
    /// argument is given.
    fn uid_function(&self) -> Value {
        let this = self.clone();
        Value::Function(Rc::new(move |args| {
            let n = this.next_uid();
            match args.first() {
                Some(prefix) if !matches!(prefix, Value::Undefined | Value::Null) => {
                    Value::String(Rc::from(format!("volt-{}-{n}", prefix.to_display_string()).as_str()))
                }
                _ => Value::String(Rc::from(format!("volt-{n}").as_str())),
            }
        }))
    }

    /// `$emit(name, detail?)` — dispatches a bubbling custom event from the
    /// mount's root element.
    fn emit_function(&self) -> Value {
        let this = self.clone();
        Value::Function(Rc::new(move |args| {
            let Some(root) = this.root_frame().origin.clone() else {
                return Value::Undefined;
            };
            let name = args.first().map(Value::to_display_string).unwrap_or_default();
            let detail = args.get(1).cloned().unwrap_or(Value::Undefined);
            root.dispatch_custom_event(&name, &detail);
            Value::Undefined
        }))
    }

    /// `$probe(expr, cb)` — evaluates `expr` against this scope inside a
    /// reactive effect, invoking `cb` with the fresh value every time a
    /// dependency the expression read changes, and returns a disposer
    /// (itself callable) that tears the effect down.
    fn probe_function(&self) -> Value {
        let this = self.clone();
        Value::Function(Rc::new(move |args| {
            let (Some(Value::String(src)), Some(Value::Function(cb))) = (args.first().cloned(), args.get(1).cloned())
            else {
                return Value::Undefined;
            };
            let scope = this.clone();
            let effect = crate::reactive::Effect::new(move || {
                match crate::expr::evaluate_expression(&src, &scope) {
                    Ok(value) => {
                        cb(&[value]);
                    }
                    Err(err) => {
                        crate::error::report(crate::error::VoltError::Evaluation {
                            expr: src.to_string(),
                            cause: err.to_string(),
                        });
                    }
                }
                None
            });
            Value::Function(Rc::new(move |_| {
                effect.dispose();
                Value::Undefined
            }))
        }))
    }
}

impl Environment for Scope {
    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "$el" => self.nearest_origin().map(Value::from),
            "$event" => self.nearest_event(),
            "$pins" => Some(self.pins_snapshot()),
            "$uid" => Some(self.uid_function()),
            "$emit" => Some(self.emit_function()),
            "$probe" => Some(self.probe_function()),
            "$defer" => Some(Value::Function(Rc::new(|args| {
                if let Some(Value::Function(cb)) = args.first().cloned() {
                    crate::dom::defer(move || {
                        cb(&[]);
                    });
                }
                Value::Undefined
            }))),
            _ => self.lookup_var(name),
        }
    }

    fn set(&self, name: &str, value: Value) -> bool {
        // `$`-prefixed names are read-only special variables; assignment to
        // them is rejected the same way assigning to an unbound identifier
        // is, rather than silently shadowing them per-frame.
        if name.starts_with('$') {
            return false;
        }
        let mut frame = self.clone();
        loop {
            if frame.0.vars.borrow().contains_key(name) {
                frame.0.vars.borrow_mut().insert(name.to_string(), value);
                return true;
            }
            match frame.0.parent.clone() {
                Some(p) => frame = p,
                None => return false,
            }
        }
    }
}

// `Scope::root` requires a live `ElementHandle`, so its tests live alongside
// the rest of the DOM-dependent suite in `tests/web/scope.rs` rather than
// inline here (see that file for coverage of shadowing, pin visibility, the
// uid counter, and the `$`-prefix assignment guard).
