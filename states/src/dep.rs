use std::{any::TypeId, collections::BTreeMap};

use crate::{
    Compute, Error, State,
    ctx::{ComputeEntry, StateEntry},
};

/// Read-only view over every registered state and compute.
///
/// Handed to [`Compute::compute`] and [`Command::run`](crate::Command::run).
#[derive(Clone, Copy)]
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, StateEntry>,
    computes: &'a BTreeMap<TypeId, ComputeEntry>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, StateEntry>,
        computes: &'a BTreeMap<TypeId, ComputeEntry>,
    ) -> Self {
        Self { states, computes }
    }

    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        self.try_state_ref::<T>()
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>()))
    }

    pub fn try_state_ref<T: State>(&self) -> Option<&'a T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// # Panics
    /// Panics if `T` was never registered with `record_compute`.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.as_any().downcast_ref::<T>())
            .unwrap_or_else(|| panic!("{}", Error::compute_not_found::<T>()))
    }
}
