use std::fmt::Debug;

use crate::{Dep, Updater};

/// Manual-only action dispatched through
/// [`StateCtx::dispatch`](crate::StateCtx::dispatch).
///
/// A command never mutates the context directly. It reads what it needs from
/// `deps` and sends replacement values through `updater`, either right away or
/// from a callback once some I/O finished.
pub trait Command: Send + Debug + 'static {
    fn run(&self, deps: Dep<'_>, updater: Updater);
}
