//! [`Effect`]: fire-and-forget side effects with the same tracking mechanics
//! as a derivation but no stored value.
//!
//! Grounded on `sycamore_reactive`'s `effect.rs`: an effect runs immediately,
//! clears and recreates its dependency subscriptions on every re-run, and
//! supports a cleanup closure registered via `on_cleanup` that runs before the
//! next re-execution and again on disposal. Here cleanup is returned directly
//! from the effect closure (base spec §3) rather than registered through an
//! ambient `on_cleanup` call, which keeps the effect's `Rc<RefCell<...>>`
//! bookkeeping self-contained.

use std::cell::RefCell;
use std::rc::Rc;

use super::tracker::{self, BoxedCallback, TrackingGuard};

type Cleanup = Box<dyn FnOnce()>;
type EffectFn = dyn FnMut() -> Option<Cleanup>;

struct EffectState {
    f: RefCell<Box<EffectFn>>,
    cleanup: RefCell<Option<Cleanup>>,
    upstream: RefCell<Vec<Box<dyn FnOnce()>>>,
    disposed: RefCell<bool>,
}

/// A handle to a running effect. Dropping the handle does **not** dispose the
/// effect (the effect keeps itself alive via its own subscriptions, as in the
/// teacher); call [`Effect::dispose`] explicitly, typically from a mount
/// teardown list.
pub struct Effect(Rc<EffectState>);

impl Clone for Effect {
    fn clone(&self) -> Self {
        Effect(Rc::clone(&self.0))
    }
}

impl Effect {
    /// Create and immediately run an effect. The closure may return a cleanup
    /// closure; if it does, the cleanup runs right before the next
    /// re-execution and once more when the effect is disposed.
    pub fn new(f: impl FnMut() -> Option<Cleanup> + 'static) -> Self {
        let state = Rc::new(EffectState {
            f: RefCell::new(Box::new(f)),
            cleanup: RefCell::new(None),
            upstream: RefCell::new(Vec::new()),
            disposed: RefCell::new(false),
        });
        let effect = Effect(state);
        effect.run();
        effect
    }

    fn run(&self) {
        if *self.0.disposed.borrow() {
            return;
        }
        // Run the previous cleanup (if any) before re-executing, untracked,
        // matching the teacher's "destroy old scope before creating the new
        // one" ordering.
        if let Some(cleanup) = self.0.cleanup.borrow_mut().take() {
            tracker::untracked(cleanup);
        }
        // Drop subscriptions to the previous dependency set.
        for unsub in self.0.upstream.borrow_mut().drain(..) {
            unsub();
        }

        let guard = TrackingGuard::new(None);
        let mut f = self.0.f.borrow_mut();
        let new_cleanup = (f)();
        drop(f);
        let deps = guard.finish();
        *self.0.cleanup.borrow_mut() = new_cleanup;

        let this = self.clone();
        let mut new_unsubs = Vec::with_capacity(deps.len());
        for dep in &deps {
            let this2 = this.clone();
            let cb: BoxedCallback = Rc::new(RefCell::new(move || this2.run()));
            new_unsubs.push((dep.subscribe)(cb));
        }
        *self.0.upstream.borrow_mut() = new_unsubs;
    }

    /// Dispose the effect: unsubscribe from every tracked dependency and run
    /// the last cleanup, if any. Idempotent.
    pub fn dispose(&self) {
        if *self.0.disposed.borrow() {
            return;
        }
        *self.0.disposed.borrow_mut() = true;
        for unsub in self.0.upstream.borrow_mut().drain(..) {
            unsub();
        }
        if let Some(cleanup) = self.0.cleanup.borrow_mut().take() {
            tracker::untracked(cleanup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::cell::Cell;
    use std::cell::Cell as StdCell;

    #[test]
    fn runs_immediately() {
        let ran = Rc::new(StdCell::new(false));
        let ran2 = ran.clone();
        let _effect = Effect::new(move || {
            ran2.set(true);
            None
        });
        assert!(ran.get());
    }

    #[test]
    fn reruns_on_tracked_cell_write() {
        let trigger = Cell::new(0);
        let trigger2 = trigger.clone();
        let runs = Rc::new(StdCell::new(0));
        let runs2 = runs.clone();
        let _effect = Effect::new(move || {
            trigger2.get();
            runs2.set(runs2.get() + 1);
            None
        });
        assert_eq!(runs.get(), 1);
        trigger.set(1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn cleanup_runs_before_rerun_and_on_dispose() {
        let trigger = Cell::new(0);
        let trigger2 = trigger.clone();
        let cleanups = Rc::new(StdCell::new(0));
        let c2 = cleanups.clone();
        let effect = Effect::new(move || {
            trigger2.get();
            let c3 = c2.clone();
            Some(Box::new(move || c3.set(c3.get() + 1)) as Box<dyn FnOnce()>)
        });
        assert_eq!(cleanups.get(), 0);
        trigger.set(1);
        assert_eq!(cleanups.get(), 1); // cleanup from first run fired before second run
        effect.dispose();
        assert_eq!(cleanups.get(), 2); // cleanup from second run fired on dispose
    }

    #[test]
    fn dispose_is_idempotent_and_stops_future_reruns() {
        let trigger = Cell::new(0);
        let trigger2 = trigger.clone();
        let runs = Rc::new(StdCell::new(0));
        let runs2 = runs.clone();
        let effect = Effect::new(move || {
            trigger2.get();
            runs2.set(runs2.get() + 1);
            None
        });
        effect.dispose();
        effect.dispose(); // idempotent
        trigger.set(1);
        assert_eq!(runs.get(), 1); // no further reruns after disposal
    }
}
