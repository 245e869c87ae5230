use std::any::Any;

/// A value registered in a [`StateCtx`](crate::StateCtx), looked up by type.
///
/// Implementors are plain data; the runtime owns them and hands out
/// references through [`Dep`](crate::Dep) and the context accessors.
pub trait State: Any + Send {}
