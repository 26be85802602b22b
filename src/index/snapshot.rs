use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use roaring::RoaringBitmap;
use tracing::{debug, info};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::filter::liveness::{LivenessFilter, LivenessFilterProvider};
use crate::index::inverted::InvertedIndex;

/// Index state at one point in time
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub version: u64,
    pub generation: u64,            // Version that published `index`
    pub index: Arc<InvertedIndex>,
    pub timestamp: DateTime<Utc>,
    pub deleted_docs: Arc<RoaringBitmap>,
}

impl Snapshot {
    /// Physically present documents, deleted ones included.
    pub fn doc_count(&self) -> u32 {
        self.index.doc_count()
    }

    pub fn live_count(&self) -> u64 {
        u64::from(self.index.doc_count()) - self.deleted_docs.len()
    }

    pub fn is_deleted(&self, doc_id: DocId) -> bool {
        self.deleted_docs.contains(doc_id.0)
    }

    pub fn liveness(&self) -> LivenessFilter {
        LivenessFilter::new(self.version, self.deleted_docs.clone()).with_generation(self.generation)
    }
}

impl LivenessFilterProvider for Snapshot {
    fn liveness_filter(&self) -> Option<LivenessFilter> {
        Some(self.liveness())
    }
}

/// Publishes immutable snapshots; updates swap in a new one.
///
/// Readers hold an `Arc<Snapshot>` and never see it change. Soft deletes only
/// mark documents in the new snapshot's bitmap, their postings remain.
pub struct IndexSnapshots {
    current: RwLock<Arc<Snapshot>>,
    next_version: AtomicU64,
}

impl IndexSnapshots {
    pub fn new(index: InvertedIndex) -> Self {
        let snapshot = Snapshot {
            version: 0,
            generation: 0,
            index: Arc::new(index),
            timestamp: Utc::now(),
            deleted_docs: Arc::new(RoaringBitmap::new()),
        };
        IndexSnapshots {
            current: RwLock::new(Arc::new(snapshot)),
            next_version: AtomicU64::new(1),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Replace the index; document ids restart, so deletions are reset.
    pub fn publish(&self, index: InvertedIndex) -> Arc<Snapshot> {
        let mut current = self.current.write();
        let version = self.next_version.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(Snapshot {
            version,
            generation: version,
            index: Arc::new(index),
            timestamp: Utc::now(),
            deleted_docs: Arc::new(RoaringBitmap::new()),
        });
        info!(version = snapshot.version, docs = snapshot.doc_count(), "published index snapshot");
        *current = snapshot.clone();
        snapshot
    }

    pub fn delete_document(&self, doc_id: DocId) -> Result<Arc<Snapshot>> {
        self.delete_documents([doc_id])
    }

    /// Mark documents deleted in a new snapshot version.
    pub fn delete_documents(&self, doc_ids: impl IntoIterator<Item = DocId>) -> Result<Arc<Snapshot>> {
        let mut current = self.current.write();
        let mut deleted = (*current.deleted_docs).clone();
        for doc_id in doc_ids {
            if doc_id.0 >= current.doc_count() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("document {} is not in the index", doc_id.0),
                ));
            }
            deleted.insert(doc_id.0);
        }

        let snapshot = Arc::new(Snapshot {
            version: self.next_version.fetch_add(1, Ordering::SeqCst),
            generation: current.generation,
            index: current.index.clone(),
            timestamp: Utc::now(),
            deleted_docs: Arc::new(deleted),
        });
        debug!(version = snapshot.version, deleted = snapshot.deleted_docs.len(), "published deletions");
        *current = snapshot.clone();
        Ok(snapshot)
    }
}

impl LivenessFilterProvider for IndexSnapshots {
    fn liveness_filter(&self) -> Option<LivenessFilter> {
        Some(self.current().liveness())
    }
}
