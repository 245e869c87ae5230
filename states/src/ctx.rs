use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use flume::{Receiver, Sender};
use log::{error, warn};

use crate::{
    Command, Compute, ComputeStage, Dep, Error, Graph, State, StateSyncStatus, TopologyError,
    Updater, updater::Update,
};

pub(crate) struct StateEntry {
    pub(crate) value: Box<dyn Any + Send>,
    pub(crate) status: StateSyncStatus,
}

pub(crate) struct ComputeEntry {
    pub(crate) value: Box<dyn Compute>,
    pub(crate) status: StateSyncStatus,
    deps: Vec<TypeId>,
}

/// Owner of every state, compute and command of the application.
pub struct StateCtx {
    states: BTreeMap<TypeId, StateEntry>,
    computes: BTreeMap<TypeId, ComputeEntry>,
    commands: BTreeMap<TypeId, Box<dyn Command>>,
    command_queue: VecDeque<(TypeId, &'static str)>,

    graph: Graph<TypeId>,
    // evaluation order of computes, rebuilt after `record_compute`
    compute_order: Option<Vec<TypeId>>,

    send: Sender<Update>,
    recv: Receiver<Update>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued_commands", &self.command_queue.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            command_queue: VecDeque::new(),
            graph: Graph::new(),
            compute_order: None,
            send,
            recv,
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(
            TypeId::of::<T>(),
            StateEntry {
                value: Box::new(state),
                status: StateSyncStatus::Dirty,
            },
        );
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        let (state_ids, compute_ids) = compute.deps();

        self.graph.add_node(id);
        for dep in &compute_ids {
            self.graph.route_to(*dep, id, ());
        }

        let deps = state_ids.into_iter().chain(compute_ids).collect();
        self.computes.insert(
            id,
            ComputeEntry {
                value: Box::new(compute),
                status: StateSyncStatus::Init,
                deps,
            },
        );
        self.compute_order = None;
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Box::new(command));
    }

    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>()))
    }

    pub fn try_state<T: State>(&self) -> Option<&T> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// Mutable access for UI edits. Marks the state dirty.
    ///
    /// # Panics
    /// Panics if `T` was never registered.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        self.states
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| {
                entry.status = StateSyncStatus::Dirty;
                entry.value.downcast_mut::<T>()
            })
            .unwrap_or_else(|| panic!("{}", Error::state_not_found::<T>()))
    }

    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.as_any().downcast_ref::<T>())
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        self.command_queue
            .push_back((TypeId::of::<T>(), type_name::<T>()));
    }

    /// Runs every queued command, in order.
    pub fn flush_commands(&mut self) {
        while let Some((id, name)) = self.command_queue.pop_front() {
            let Some(command) = self.commands.get(&id) else {
                error!("{}", Error::CommandNotFound { name });
                continue;
            };
            command.run(Dep::new(&self.states, &self.computes), self.updater());
        }
    }

    /// Runs command `T` right away.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    /// Applies every value sent through an [`Updater`] so far.
    pub fn sync_computes(&mut self) {
        while let Ok(update) = self.recv.try_recv() {
            match update {
                Update::State { id, name, value } => match self.states.get_mut(&id) {
                    Some(entry) => {
                        entry.value = value;
                        entry.status = StateSyncStatus::Dirty;
                    }
                    None => warn!("sync_computes: dropping update for unknown state {name}"),
                },
                Update::Compute { id, name, value } => match self.computes.get_mut(&id) {
                    Some(entry) => {
                        entry.value = value;
                        entry.status = StateSyncStatus::Dirty;
                    }
                    None => warn!("sync_computes: dropping update for unknown compute {name}"),
                },
            }
        }
    }

    /// Recomputes every compute whose dependencies changed since the last pass.
    pub fn run_computed(&mut self) {
        let order = self.compute_order();

        let changed: BTreeSet<TypeId> = self
            .states
            .iter()
            .filter(|(_, entry)| entry.status == StateSyncStatus::Dirty)
            .map(|(id, _)| *id)
            .chain(
                self.computes
                    .iter()
                    .filter(|(_, entry)| entry.status == StateSyncStatus::Dirty)
                    .map(|(id, _)| *id),
            )
            .collect();

        let mut stages = Vec::new();
        for id in order {
            let Some(entry) = self.computes.get(&id) else {
                continue;
            };
            let should_run = entry.status == StateSyncStatus::Init
                || entry.deps.iter().any(|dep| changed.contains(dep));
            if should_run {
                let stage = entry
                    .value
                    .compute(Dep::new(&self.states, &self.computes), self.updater());
                stages.push((id, stage));
            }
        }

        for entry in self.states.values_mut() {
            entry.status = StateSyncStatus::Clean;
        }
        for entry in self.computes.values_mut() {
            if entry.status == StateSyncStatus::Dirty {
                entry.status = StateSyncStatus::Clean;
            }
        }
        for (id, stage) in stages {
            if let Some(entry) = self.computes.get_mut(&id) {
                entry.status = match stage {
                    ComputeStage::Finished => StateSyncStatus::Clean,
                    ComputeStage::Pending => StateSyncStatus::Pending,
                };
            }
        }
    }

    /// Checks that the compute dependency graph has no cycle.
    pub fn verify_deps(&self) -> Result<(), TopologyError<TypeId>> {
        self.graph.topology_sort().map(|_| ())
    }

    pub fn status<T: 'static>(&self) -> Option<StateSyncStatus> {
        let id = TypeId::of::<T>();
        self.states
            .get(&id)
            .map(|entry| entry.status)
            .or_else(|| self.computes.get(&id).map(|entry| entry.status))
    }

    fn compute_order(&mut self) -> Vec<TypeId> {
        if let Some(order) = &self.compute_order {
            return order.clone();
        }

        let order = match self.graph.topology_sort() {
            Ok(order) => order,
            Err(err) => {
                error!("run_computed: {err}, falling back to registration order");
                self.computes.keys().copied().collect()
            }
        };
        self.compute_order = Some(order.clone());
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
    }

    impl State for Counter {}

    #[derive(Debug, Default)]
    struct Doubled {
        value: u32,
        runs: u32,
    }

    impl Compute for Doubled {
        fn deps(&self) -> crate::ComputeDeps {
            (vec![TypeId::of::<Counter>()], vec![])
        }

        fn compute(&self, deps: Dep<'_>, updater: Updater) -> ComputeStage {
            let counter = deps.get_state_ref::<Counter>();
            updater.set(Self {
                value: counter.value * 2,
                runs: self.runs + 1,
            });
            ComputeStage::Finished
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug, Default)]
    struct Bump;

    impl Command for Bump {
        fn run(&self, deps: Dep<'_>, updater: Updater) {
            let counter = deps.get_state_ref::<Counter>();
            updater.set_state(Counter {
                value: counter.value + 1,
            });
        }
    }

    fn ctx() -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.record_compute(Doubled::default());
        ctx.record_command(Bump);
        ctx
    }

    fn doubled(ctx: &StateCtx) -> &Doubled {
        ctx.cached::<Doubled>().expect("Doubled should be registered")
    }

    #[test]
    fn compute_runs_on_first_pass() {
        let mut ctx = ctx();
        ctx.run_computed();
        ctx.sync_computes();

        assert_eq!(doubled(&ctx).runs, 1);
        assert_eq!(doubled(&ctx).value, 0);
    }

    #[test]
    fn compute_reruns_only_when_dep_changes() {
        let mut ctx = ctx();
        ctx.run_computed();
        ctx.sync_computes();
        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(doubled(&ctx).runs, 1, "nothing changed, no rerun");

        ctx.update::<Counter>(|c| c.value = 21);
        ctx.run_computed();
        ctx.sync_computes();
        assert_eq!(doubled(&ctx).runs, 2);
        assert_eq!(doubled(&ctx).value, 42);
    }

    #[test]
    fn dispatch_applies_after_sync() {
        let mut ctx = ctx();
        ctx.dispatch::<Bump>();
        assert_eq!(ctx.state::<Counter>().value, 0, "not applied before sync");

        ctx.sync_computes();
        assert_eq!(ctx.state::<Counter>().value, 1);
        assert_eq!(ctx.status::<Counter>(), Some(StateSyncStatus::Dirty));
    }

    #[test]
    fn enqueued_commands_wait_for_flush() {
        let mut ctx = ctx();
        ctx.enqueue_command::<Bump>();
        ctx.enqueue_command::<Bump>();
        ctx.sync_computes();
        assert_eq!(ctx.state::<Counter>().value, 0);

        ctx.flush_commands();
        ctx.sync_computes();
        // both commands read the same snapshot
        assert_eq!(ctx.state::<Counter>().value, 1);
    }

    #[test]
    fn unregistered_command_is_skipped() {
        #[derive(Debug)]
        struct Missing;
        impl Command for Missing {
            fn run(&self, _deps: Dep<'_>, _updater: Updater) {}
        }

        let mut ctx = ctx();
        ctx.dispatch::<Missing>();
        ctx.sync_computes();
        assert_eq!(ctx.state::<Counter>().value, 0);
    }

    #[test]
    fn update_for_unknown_state_is_dropped() {
        #[derive(Debug)]
        struct Unknown;
        impl State for Unknown {}

        let mut ctx = ctx();
        ctx.updater().set_state(Unknown);
        ctx.sync_computes();
        assert!(ctx.try_state::<Unknown>().is_none());
    }

    #[derive(Debug, Default)]
    struct Slow {
        value: Option<u32>,
    }

    impl Compute for Slow {
        fn deps(&self) -> crate::ComputeDeps {
            (vec![TypeId::of::<Counter>()], vec![])
        }

        fn compute(&self, _deps: Dep<'_>, _updater: Updater) -> ComputeStage {
            // the value is delivered later through an updater
            ComputeStage::Pending
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn pending_compute_settles_when_value_arrives() {
        let mut ctx = ctx();
        ctx.record_compute(Slow::default());
        ctx.run_computed();
        assert_eq!(ctx.status::<Slow>(), Some(StateSyncStatus::Pending));

        ctx.updater().set(Slow { value: Some(3) });
        ctx.sync_computes();
        assert_eq!(ctx.status::<Slow>(), Some(StateSyncStatus::Dirty));

        ctx.run_computed();
        assert_eq!(ctx.status::<Slow>(), Some(StateSyncStatus::Clean));
        assert_eq!(ctx.cached::<Slow>().and_then(|slow| slow.value), Some(3));
    }

    #[test]
    fn verify_deps_accepts_acyclic_graph() {
        let ctx = ctx();
        assert!(ctx.verify_deps().is_ok());
    }

    #[test]
    #[should_panic(expected = "State not found")]
    fn missing_state_panics_with_type_name() {
        let ctx = StateCtx::new();
        let _ = ctx.state::<Counter>();
    }
}
