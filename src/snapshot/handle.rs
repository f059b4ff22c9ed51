//! Shared handle to the live snapshot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::snapshot::Snapshot;

/// Single-writer, many-reader pointer to the current [`Snapshot`].
///
/// Readers get an `Arc` to a complete snapshot or `None` before the first
/// successful reload. Only the reload orchestrator stores.
#[derive(Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<ArcSwapOption<Snapshot>>,
}

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Hold the `Arc` for one request, no longer.
    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.inner.load_full()
    }

    /// Generation of the current snapshot, 0 when none is published.
    pub fn generation(&self) -> u64 {
        self.inner
            .load()
            .as_ref()
            .map(|snapshot| snapshot.generation())
            .unwrap_or(0)
    }

    pub(crate) fn store(&self, snapshot: Arc<Snapshot>) {
        self.inner.store(Some(snapshot));
    }
}

impl std::fmt::Debug for SnapshotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHandle")
            .field("generation", &self.generation())
            .finish()
    }
}
