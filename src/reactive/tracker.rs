//! The dependency tracker: a per-agent stack recording which cells a currently
//! running compute reads.
//!
//! Mirrors the role of `sycamore_reactive::root::Root`'s tracking stack, but
//! instead of building a node graph that gets topologically sorted at
//! propagation time, each frame accumulates ready-made *subscribe thunks*: a
//! [`Cell`](super::cell::Cell)/[`Derivation`](super::derivation::Derivation)
//! read during a tracked compute hands the tracker a closure that, given a
//! boxed callback, subscribes it and returns a disposer. This lets a
//! derivation or effect re-subscribe to exactly the dependencies it read on
//! its last run without a separate id-to-object registry.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Opaque identifier for a cell or derivation, used only for identity
    /// comparisons (dedup, self-cycle detection) inside this module.
    pub struct CellId;
}

thread_local! {
    /// Mints unique `CellId`s. Entries are never removed: ids only need to be
    /// unique for the life of the process, not reclaimed.
    static ID_ARENA: RefCell<SlotMap<CellId, ()>> = RefCell::new(SlotMap::with_key());
}

/// Allocate a fresh, process-unique id for a new cell or derivation.
pub(crate) fn mint_id() -> CellId {
    ID_ARENA.with(|a| a.borrow_mut().insert(()))
}

/// A callback boxed for storage in a subscriber list.
pub(crate) type BoxedCallback = Rc<RefCell<dyn FnMut()>>;

/// A dependency recorded by a tracking frame: the id (for dedup/cycle
/// detection) plus a thunk that subscribes an arbitrary callback to it.
pub(crate) struct Dep {
    pub id: CellId,
    pub subscribe: Rc<dyn Fn(BoxedCallback) -> Box<dyn FnOnce()>>,
}

struct Frame {
    /// Set when this frame belongs to a derivation's own recompute; lets
    /// [`record_dep`] detect the derivation reading itself.
    source: Option<CellId>,
    deps: Vec<Dep>,
}

thread_local! {
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Raised when a derivation reads a cell that resolves back to itself while it
/// is recomputing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("circular dependency: derivation read itself while recomputing")]
pub struct CircularDependency;

fn push(source: Option<CellId>) {
    STACK.with(|s| {
        s.borrow_mut().push(Frame {
            source,
            deps: Vec::new(),
        })
    });
}

fn pop() -> Vec<Dep> {
    STACK.with(|s| {
        s.borrow_mut()
            .pop()
            .expect("tracker frame popped without a matching push")
            .deps
    })
}

/// Record a read against the current top frame, if any. `subscribe` is a
/// cheap closure (typically capturing a clone of the reactive handle) used to
/// attach a callback to this dependency later, when a derivation/effect
/// resubscribes after recomputing.
///
/// Returns `Err` if `id` equals the active frame's `source`, i.e. a derivation
/// reading itself mid-recompute.
pub(crate) fn record_dep(
    id: CellId,
    subscribe: impl Fn(BoxedCallback) -> Box<dyn FnOnce()> + 'static,
) -> Result<(), CircularDependency> {
    STACK.with(|s| {
        let mut stack = s.borrow_mut();
        let Some(frame) = stack.last_mut() else {
            return Ok(());
        };
        if frame.source == Some(id) {
            return Err(CircularDependency);
        }
        if !frame.deps.iter().any(|d| d.id == id) {
            frame.deps.push(Dep {
                id,
                subscribe: Rc::new(subscribe),
            });
        }
        Ok(())
    })
}

/// Run `f` with tracking suspended: reads inside `f` are not recorded against
/// any enclosing frame. Used by `get_untracked` and by cleanup callbacks.
pub(crate) fn untracked<T>(f: impl FnOnce() -> T) -> T {
    let saved = STACK.with(|s| s.borrow_mut().pop());
    let ret = f();
    if let Some(frame) = saved {
        STACK.with(|s| s.borrow_mut().push(frame));
    }
    ret
}

/// RAII guard around a tracking frame: pushes on construction, pops (and
/// yields the recorded deps) on [`Self::finish`]. Using the guard keeps the
/// push/pop invariant even when the wrapped closure panics or early-returns.
pub(crate) struct TrackingGuard {
    finished: bool,
}

impl TrackingGuard {
    pub(crate) fn new(source: Option<CellId>) -> Self {
        push(source);
        TrackingGuard { finished: false }
    }

    pub(crate) fn finish(mut self) -> Vec<Dep> {
        self.finished = true;
        pop()
    }
}

impl Drop for TrackingGuard {
    fn drop(&mut self) {
        if !self.finished {
            let _ = pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_subscribe(_cb: BoxedCallback) -> Box<dyn FnOnce()> {
        Box::new(|| {})
    }

    #[test]
    fn records_reads_only_while_tracking() {
        let a = mint_id();
        let b = mint_id();

        // No frame active: recording is a silent no-op.
        record_dep(a, noop_subscribe).unwrap();

        let guard = TrackingGuard::new(None);
        record_dep(a, noop_subscribe).unwrap();
        record_dep(b, noop_subscribe).unwrap();
        record_dep(a, noop_subscribe).unwrap(); // duplicate, should not appear twice
        let deps = guard.finish();
        assert_eq!(deps.len(), 2);
        assert!(deps.iter().any(|d| d.id == a));
        assert!(deps.iter().any(|d| d.id == b));
    }

    #[test]
    fn self_read_during_recompute_is_circular() {
        let a = mint_id();

        let guard = TrackingGuard::new(Some(a));
        let err = record_dep(a, noop_subscribe).unwrap_err();
        assert_eq!(err, CircularDependency);
        let _ = guard.finish();
    }

    #[test]
    fn untracked_suspends_current_frame() {
        let a = mint_id();

        let guard = TrackingGuard::new(None);
        untracked(|| {
            record_dep(a, noop_subscribe).unwrap();
        });
        let deps = guard.finish();
        assert!(deps.is_empty());
    }
}
