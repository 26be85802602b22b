use std::hash::{Hash, Hasher};
use std::sync::Arc;
use roaring::RoaringBitmap;
use crate::core::types::DocId;

/// Documents not marked deleted in one published index version.
///
/// Holds the deleted-docs bitmap of that version; evaluation subtracts it from
/// every document physically present. Doc ids are only meaningful within the
/// index generation the filter was taken from.
#[derive(Debug, Clone)]
pub struct LivenessFilter {
    generation: u64,
    version: u64,
    deleted: Arc<RoaringBitmap>,
}

impl LivenessFilter {
    pub fn new(version: u64, deleted: Arc<RoaringBitmap>) -> Self {
        LivenessFilter { generation: 0, version, deleted }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Version at which the underlying index was published.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn deleted(&self) -> &RoaringBitmap {
        &self.deleted
    }

    pub fn is_live(&self, doc_id: DocId) -> bool {
        !self.deleted.contains(doc_id.0)
    }
}

impl PartialEq for LivenessFilter {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
            && self.version == other.version
            && (Arc::ptr_eq(&self.deleted, &other.deleted) || self.deleted == other.deleted)
    }
}

impl Eq for LivenessFilter {}

impl Hash for LivenessFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.generation.hash(state);
        self.version.hash(state);
        self.deleted.len().hash(state);
    }
}

/// Supplies the liveness filter at query-build time.
///
/// Owned by the indexer; `None` means deletions are not tracked and every
/// document counts as live.
pub trait LivenessFilterProvider: Send + Sync {
    fn liveness_filter(&self) -> Option<LivenessFilter>;
}

/// Provider for indexes without deletion tracking
pub struct NoLiveness;

impl LivenessFilterProvider for NoLiveness {
    fn liveness_filter(&self) -> Option<LivenessFilter> {
        None
    }
}

impl LivenessFilterProvider for LivenessFilter {
    fn liveness_filter(&self) -> Option<LivenessFilter> {
        Some(self.clone())
    }
}
