use std::any::{Any, TypeId};
use std::fmt::Debug;

use crate::{Dep, Updater};

/// Dependencies of a compute: `(state type ids, compute type ids)`.
pub type ComputeDeps = (Vec<TypeId>, Vec<TypeId>);

/// Outcome of a single [`Compute::compute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeStage {
    /// The new value was sent through the updater (or nothing changed).
    Finished,
    /// Work is still in flight; a value will arrive later.
    Pending,
}

/// A derived value cached by the runtime.
///
/// `compute` is called with a read view of every registered value whenever
/// one of `deps()` changed since the previous pass. It publishes its result
/// with `updater.set(Self { .. })`.
pub trait Compute: Any + Send + Debug {
    fn deps(&self) -> ComputeDeps;

    fn compute(&self, deps: Dep<'_>, updater: Updater) -> ComputeStage;

    fn as_any(&self) -> &dyn Any;
}
