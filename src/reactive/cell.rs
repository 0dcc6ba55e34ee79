//! [`Cell`]: a single-value reactive source with synchronous, subscriber-list
//! notification.
//!
//! This is deliberately simpler than `sycamore_reactive`'s `Root`-owned node
//! graph (`root.rs`/`node.rs`): base spec §3 describes each cell holding its
//! own subscriber set directly rather than participating in a
//! topologically-sorted propagation graph, so a cell here is a plain
//! `Rc`-backed handle with its own subscriber vec, and `CellId` (from
//! [`super::tracker`]) is only used as an identity token for dependency
//! tracking and cycle detection, the same role `NodeId` plays in the
//! teacher's arena.

use std::cell::RefCell;
use std::rc::Rc;

use super::tracker::{self, BoxedCallback, CellId};

struct Subscriber {
    id: u64,
    callback: BoxedCallback,
}

struct CellData<T> {
    value: T,
    subscribers: Vec<Subscriber>,
    next_sub_id: u64,
}

struct CellState<T> {
    id: CellId,
    data: RefCell<CellData<T>>,
}

/// A single-value reactive source.
///
/// Reads record a dependency against the currently active tracking frame (if
/// any); writes that are not equal to the current value notify every
/// subscriber synchronously, in insertion order, over a snapshot of the
/// subscriber set taken at notify time so that a subscriber may add or remove
/// subscribers without invalidating the iteration.
pub struct Cell<T>(Rc<CellState<T>>);

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Cell(Rc::clone(&self.0))
    }
}

/// Disposes a single subscription when dropped or invoked explicitly.
#[must_use = "dropping this immediately unsubscribes; bind it to keep the subscription alive"]
pub struct Unsubscribe<T> {
    cell: Cell<T>,
    id: u64,
    armed: bool,
}

impl<T> Unsubscribe<T> {
    /// Remove the subscription. Idempotent.
    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.cell.0.data.borrow_mut().subscribers.retain(|s| s.id != self.id);
    }
}

impl<T> Drop for Unsubscribe<T> {
    fn drop(&mut self) {
        self.run();
    }
}

impl<T: 'static> Cell<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Cell(Rc::new(CellState {
            id: tracker::mint_id(),
            data: RefCell::new(CellData {
                value,
                subscribers: Vec::new(),
                next_sub_id: 0,
            }),
        }))
    }

    /// Opaque identity used by the dependency tracker and extractor.
    pub(crate) fn id(&self) -> CellId {
        self.0.id
    }

    fn track_self(&self) {
        let this = self.clone();
        let _ = tracker::record_dep(self.id(), move |cb| this.subscribe_dyn(cb));
    }

    /// Read the current value, recording a dependency if a tracker is active.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.track_self();
        self.0.data.borrow().value.clone()
    }

    /// Read the current value without recording a dependency.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        self.0.data.borrow().value.clone()
    }

    /// Borrow the current value without cloning or tracking.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.data.borrow().value)
    }

    /// Write a new value unconditionally, notifying subscribers. Prefer
    /// [`Self::set_eq`] when `T: PartialEq` so that the spec's
    /// reference-equality write gate (base spec §3) is honored.
    pub fn set(&self, new: T) {
        self.0.data.borrow_mut().value = new;
        self.notify();
    }

    /// Write a new value, skipping notification when `new` equals the current
    /// value (structural equality stands in for reference equality, per base
    /// spec §4.2: "callers who need structural equality must wrap values
    /// explicitly").
    pub fn set_eq(&self, new: T)
    where
        T: PartialEq,
    {
        let changed = {
            let mut data = self.0.data.borrow_mut();
            if data.value == new {
                false
            } else {
                data.value = new;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Update the value in place via `f`, then notify unconditionally.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.data.borrow_mut().value);
        self.notify();
    }

    /// Subscribe `callback` to be invoked on every future write that changes
    /// the value. Returns a disposer; dropping it unsubscribes.
    pub fn subscribe(&self, callback: impl FnMut() + 'static) -> Unsubscribe<T> {
        let cb: BoxedCallback = Rc::new(RefCell::new(callback));
        let id = self.push_subscriber(cb);
        Unsubscribe {
            cell: self.clone(),
            id,
            armed: true,
        }
    }

    fn push_subscriber(&self, callback: BoxedCallback) -> u64 {
        let mut data = self.0.data.borrow_mut();
        let id = data.next_sub_id;
        data.next_sub_id += 1;
        data.subscribers.push(Subscriber { id, callback });
        id
    }

    /// Subscribe a pre-boxed callback (used by the tracker's subscribe
    /// thunks), returning a type-erased disposer.
    pub(crate) fn subscribe_dyn(&self, callback: BoxedCallback) -> Box<dyn FnOnce()> {
        let id = self.push_subscriber(callback);
        let this = self.clone();
        Box::new(move || {
            this.0.data.borrow_mut().subscribers.retain(|s| s.id != id);
        })
    }

    /// Synchronously invoke every subscriber over a snapshot of the set taken
    /// right now. Panic isolation for subscriber callbacks is the caller's
    /// responsibility (binder/effect layer, see base spec §4.2) since only
    /// those layers know how to route a failure to the error sink.
    fn notify(&self) {
        let snapshot: Vec<BoxedCallback> = self
            .0
            .data
            .borrow()
            .subscribers
            .iter()
            .map(|s| Rc::clone(&s.callback))
            .collect();
        for callback in snapshot {
            (callback.borrow_mut())();
        }
    }

    /// Number of live subscribers. Exposed for tests and for the binder's
    /// teardown bookkeeping.
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.0.data.borrow().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    #[test]
    fn get_set_roundtrip() {
        let c = Cell::new(1);
        assert_eq!(c.get(), 1);
        c.set(2);
        assert_eq!(c.get(), 2);
    }

    #[test]
    fn set_eq_skips_notify_on_equal_value() {
        let c = Cell::new(1);
        let calls = Rc::new(StdCell::new(0));
        let calls2 = calls.clone();
        let _sub = c.subscribe(move || calls2.set(calls2.get() + 1));
        c.set_eq(1); // unchanged
        assert_eq!(calls.get(), 0);
        c.set_eq(2); // changed
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscribers_notified_in_insertion_order() {
        let c = Cell::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();
        let _s1 = c.subscribe(move || o1.borrow_mut().push(1));
        let _s2 = c.subscribe(move || o2.borrow_mut().push(2));
        c.set(1);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropping_unsubscribe_stops_notifications() {
        let c = Cell::new(0);
        let count = Rc::new(StdCell::new(0));
        let count2 = count.clone();
        let sub = c.subscribe(move || count2.set(count2.get() + 1));
        c.set(1);
        assert_eq!(count.get(), 1);
        sub.unsubscribe();
        c.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn every_write_without_eq_gate_notifies() {
        let c = Cell::new(5);
        let count = Rc::new(StdCell::new(0));
        let count2 = count.clone();
        let _s = c.subscribe(move || count2.set(count2.get() + 1));
        c.set(5);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn subscriber_count_tracks_disposal() {
        let c = Cell::new(0);
        assert_eq!(c.subscriber_count(), 0);
        let s1 = c.subscribe(|| {});
        assert_eq!(c.subscriber_count(), 1);
        s1.unsubscribe();
        assert_eq!(c.subscriber_count(), 0);
    }
}
