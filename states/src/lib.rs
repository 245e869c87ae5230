//! Typed state runtime used by the Rendezvous client.
//!
//! Values live in a [`StateCtx`] keyed by their type:
//!
//! - [`State`]: plain values edited by the UI or replaced by commands.
//! - [`Compute`]: derived values, recomputed by [`StateCtx::run_computed`]
//!   whenever one of their dependencies changed.
//! - [`Command`]: explicit actions. They read everything through a [`Dep`]
//!   and write back through an [`Updater`], possibly from another thread
//!   once an HTTP response arrives.
//!
//! Updates sent through an [`Updater`] are applied on the next
//! [`StateCtx::sync_computes`], which the UI calls once per frame.

mod basic_state;
mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod graph;
mod state;
mod state_sync_status;
mod updater;

pub use basic_state::Time;
pub use command::Command;
pub use compute::{Compute, ComputeDeps, ComputeStage};
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::Error;
pub use graph::{DepRoute, Graph, TopologyError};
pub use state::State;
pub use state_sync_status::StateSyncStatus;
pub use updater::Updater;
