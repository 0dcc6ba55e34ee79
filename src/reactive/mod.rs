//! Reactive primitives: cells, derivations, and effects tied together by
//! automatic dependency tracking (base spec §3, §4.1, §4.2).
//!
//! Unlike the teacher (`sycamore_reactive`), there is no batching scheduler
//! here: base spec §5 is explicit that "effects fire synchronously within a
//! single agent" and the core has "no concurrent/batched scheduler" — so
//! writes propagate to subscribers immediately and recursively, with no
//! `batch()` escape hatch.

mod cell;
mod derivation;
mod effect;
mod tracker;

pub use cell::{Cell, Unsubscribe};
pub use derivation::{CircularDependency, Derivation};
pub use effect::Effect;
pub(crate) use tracker::untracked;
