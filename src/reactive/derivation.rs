//! [`Derivation`]: a lazily-initialized, eagerly-recomputed read-only value.
//!
//! Grounded on `sycamore_reactive`'s `memo.rs` (`create_memo`/
//! `create_selector_with` build a memo atop a plain signal, only writing to it
//! when the computed value changes) but reworked for base spec §3's explicit
//! three-state machine (`uninitialized | valid | recomputing`) and push-based
//! eager recompute on every upstream write, rather than the teacher's
//! `Effect`-driven memo.

use std::cell::RefCell;
use std::rc::Rc;

use super::cell::Cell;
use super::tracker::{self, BoxedCallback, CellId, TrackingGuard};
pub use super::tracker::CircularDependency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DerivState {
    Uninitialized,
    Valid,
    Recomputing,
}

struct DerivationState<T> {
    id: CellId,
    state: RefCell<DerivState>,
    /// Holds the current value and subscriber list once computed at least
    /// once. `None` until the first compute.
    value_cell: RefCell<Option<Cell<T>>>,
    compute: RefCell<Box<dyn FnMut() -> T>>,
    /// Disposers for subscriptions opened against this derivation's upstream
    /// dependencies on the last recompute.
    upstream: RefCell<Vec<Box<dyn FnOnce()>>>,
}

/// A cell-like read-only value with an attached compute closure, recomputed
/// eagerly whenever one of its tracked dependencies is written.
pub struct Derivation<T>(Rc<DerivationState<T>>);

impl<T> Clone for Derivation<T> {
    fn clone(&self) -> Self {
        Derivation(Rc::clone(&self.0))
    }
}

impl<T: Clone + PartialEq + 'static> Derivation<T> {
    /// Create a derivation from `compute`. Nothing runs until the first read.
    pub fn new(compute: impl FnMut() -> T + 'static) -> Self {
        Derivation(Rc::new(DerivationState {
            id: tracker::mint_id(),
            state: RefCell::new(DerivState::Uninitialized),
            value_cell: RefCell::new(None),
            compute: RefCell::new(Box::new(compute)),
            upstream: RefCell::new(Vec::new()),
        }))
    }

    pub(crate) fn id(&self) -> CellId {
        self.0.id
    }

    fn state(&self) -> DerivState {
        *self.0.state.borrow()
    }

    /// Force (re)computation, dropping old upstream subscriptions first and
    /// subscribing to whatever the closure reads this time.
    fn recompute(&self) -> Result<(), CircularDependency> {
        // Drop subscriptions to the previous dependency set.
        for unsub in self.0.upstream.borrow_mut().drain(..) {
            unsub();
        }

        *self.0.state.borrow_mut() = DerivState::Recomputing;
        let guard = TrackingGuard::new(Some(self.id()));
        let mut compute = self.0.compute.borrow_mut();
        let new_value = (compute)();
        drop(compute);
        let deps = guard.finish();
        *self.0.state.borrow_mut() = DerivState::Valid;

        let changed = {
            let mut slot = self.0.value_cell.borrow_mut();
            match slot.as_ref() {
                Some(cell) => {
                    let old_eq_new = cell.with_untracked(|old| *old == new_value);
                    if !old_eq_new {
                        cell.set(new_value);
                    }
                    !old_eq_new
                }
                None => {
                    *slot = Some(Cell::new(new_value));
                    true
                }
            }
        };
        let _ = changed; // Cell::set already gated notify on equality.

        // Subscribe our own recompute to every upstream dependency read this
        // time. A plain write-through cell notify loop would re-enter this
        // same recompute, which is exactly the eager push model base spec
        // §4.2 calls for.
        let this = self.clone();
        let mut new_unsubs = Vec::with_capacity(deps.len());
        for dep in &deps {
            let this2 = this.clone();
            let cb: BoxedCallback = Rc::new(RefCell::new(move || {
                let _ = this2.recompute();
            }));
            new_unsubs.push((dep.subscribe)(cb));
        }
        *self.0.upstream.borrow_mut() = new_unsubs;

        Ok(())
    }

    fn ensure_valid(&self) -> Result<(), CircularDependency> {
        match self.state() {
            DerivState::Valid => Ok(()),
            DerivState::Uninitialized => self.recompute(),
            DerivState::Recomputing => Err(CircularDependency),
        }
    }

    /// Read the current value, recomputing on first access. Returns
    /// `Err(CircularDependency)` if this derivation is read from within its
    /// own compute closure (directly or through an expression that resolves
    /// back to it).
    pub fn try_get(&self) -> Result<T, CircularDependency> {
        self.ensure_valid()?;
        let this = self.clone();
        tracker::record_dep(self.id(), move |cb| this.subscribe_dyn(cb))?;
        Ok(self
            .0
            .value_cell
            .borrow()
            .as_ref()
            .expect("value_cell populated by ensure_valid")
            .get_untracked())
    }

    /// Like [`Self::try_get`] but panics on `CircularDependency`, mirroring
    /// `sycamore_reactive`'s `ReadSignal::get` panicking on a destroyed scope.
    pub fn get(&self) -> T {
        self.try_get()
            .expect("circular dependency: derivation read itself while recomputing")
    }

    /// Subscribe `callback` to be invoked whenever the computed value
    /// changes. Forces an initial compute if this derivation has never been
    /// read. Returns a disposer.
    pub fn subscribe(&self, callback: impl FnMut() + 'static) -> Box<dyn FnOnce()> {
        let _ = self.ensure_valid();
        let cb: BoxedCallback = Rc::new(RefCell::new(callback));
        self.subscribe_dyn(cb)
    }

    pub(crate) fn subscribe_dyn(&self, callback: BoxedCallback) -> Box<dyn FnOnce()> {
        let _ = self.ensure_valid();
        self.0
            .value_cell
            .borrow()
            .as_ref()
            .expect("value_cell populated by ensure_valid")
            .subscribe_dyn(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::cell::Cell;
    use std::cell::Cell as StdCell;

    #[test]
    fn lazy_until_first_read() {
        let runs = Rc::new(StdCell::new(0));
        let runs2 = runs.clone();
        let d = Derivation::new(move || {
            runs2.set(runs2.get() + 1);
            1
        });
        assert_eq!(runs.get(), 0);
        assert_eq!(d.get(), 1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn recomputes_eagerly_on_upstream_write() {
        let count = Cell::new(3);
        let count2 = count.clone();
        let double = Derivation::new(move || count2.get() * 2);
        assert_eq!(double.get(), 6);
        count.set(5);
        assert_eq!(double.get(), 10);
    }

    #[test]
    fn notifies_subscribers_only_on_change() {
        let count = Cell::new(0);
        let count2 = count.clone();
        let parity = Derivation::new(move || count2.get() % 2 == 0);
        let notifications = Rc::new(StdCell::new(0));
        let n2 = notifications.clone();
        let _unsub = parity.subscribe(move || n2.set(n2.get() + 1));
        assert!(parity.get());
        count.set(2); // still even, no change
        assert_eq!(notifications.get(), 0);
        count.set(3); // now odd, changes
        assert_eq!(notifications.get(), 1);
    }

    #[test]
    fn self_read_is_circular_dependency() {
        // A derivation whose compute reads itself through a shared handle;
        // the inner, reentrant read is what must fail.
        let slot: Rc<RefCell<Option<Derivation<i32>>>> = Rc::new(RefCell::new(None));
        let slot2 = slot.clone();
        let inner_result = Rc::new(RefCell::new(None));
        let inner_result2 = inner_result.clone();
        let d = Derivation::new(move || {
            if let Some(d) = slot2.borrow().as_ref() {
                *inner_result2.borrow_mut() = Some(d.try_get());
            }
            1
        });
        *slot.borrow_mut() = Some(d.clone());
        assert_eq!(d.try_get(), Ok(1));
        assert_eq!(*inner_result.borrow(), Some(Err(CircularDependency)));
    }

    #[test]
    fn chained_derivations_propagate() {
        let count = Cell::new(1);
        let count2 = count.clone();
        let double = Derivation::new(move || count2.get() * 2);
        let double2 = double.clone();
        let quadruple = Derivation::new(move || double2.get() * 2);
        assert_eq!(quadruple.get(), 4);
        count.set(2);
        assert_eq!(quadruple.get(), 8);
    }
}
