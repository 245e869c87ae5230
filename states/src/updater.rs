use std::any::{Any, TypeId, type_name};
use std::fmt::{Debug, Formatter};

use flume::Sender;
use log::warn;

use crate::{Compute, State};

/// A queued replacement for one registered value.
pub(crate) enum Update {
    State {
        id: TypeId,
        name: &'static str,
        value: Box<dyn Any + Send>,
    },
    Compute {
        id: TypeId,
        name: &'static str,
        value: Box<dyn Compute>,
    },
}

/// Send-safe handle used by computes and commands to publish new values.
///
/// Values are applied on the next [`StateCtx::sync_computes`](crate::StateCtx::sync_computes).
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Replaces the cached value of compute `T`.
    pub fn set<T: Compute>(&self, compute: T) {
        self.push(Update::Compute {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            value: Box::new(compute),
        });
    }

    /// Replaces the value of state `T`.
    pub fn set_state<T: State>(&self, state: T) {
        self.push(Update::State {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            value: Box::new(state),
        });
    }

    fn push(&self, update: Update) {
        if self.send.send(update).is_err() {
            warn!("Updater: state context is gone, update dropped");
        }
    }
}

impl Debug for Updater {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("pending", &self.send.len())
            .finish()
    }
}
