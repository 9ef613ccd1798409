use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Observes the life cycle of index nodes.
///
/// An instrument is attached to one index (and every node below it) when the
/// index is created. All hooks default to doing nothing.
pub trait Instrument: fmt::Debug + Send + Sync {
    /// Called when a node at `depth` is created. The root has depth 0.
    fn node_created(&self, depth: usize) {
        let _ = depth;
    }

    /// Called when a node at `depth` is dropped.
    fn node_dropped(&self, depth: usize) {
        let _ = depth;
    }
}

/// Counts node creations and drops.
#[derive(Debug, Default)]
pub struct NodeCounter {
    created: AtomicUsize,
    dropped: AtomicUsize,
}

impl NodeCounter {
    pub fn new() -> NodeCounter {
        NodeCounter::default()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Nodes created and not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.dropped()
    }
}

impl Instrument for NodeCounter {
    fn node_created(&self, _depth: usize) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    fn node_dropped(&self, _depth: usize) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }
}
