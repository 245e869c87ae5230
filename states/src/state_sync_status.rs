/// Change tracking for a registered value between two compute passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Registered but never seen by a compute pass.
    #[default]
    Init,
    /// A compute returned `Pending` and its value has not arrived yet.
    Pending,
    /// Changed since the last compute pass.
    Dirty,
    Clean,
}
