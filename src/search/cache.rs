use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use lru::LruCache;
use parking_lot::Mutex;
use roaring::RoaringBitmap;
use crate::filter::filter::Filter;

/// Evaluated constant-score filters of one snapshot.
///
/// A capacity of zero disables caching.
pub struct FilterCache {
    cache: Option<Mutex<LruCache<Filter, Arc<RoaringBitmap>>>>,
    size_limit: usize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
}

impl FilterCache {
    pub fn new(size_limit: usize) -> Self {
        FilterCache {
            cache: NonZeroUsize::new(size_limit).map(|cap| Mutex::new(LruCache::new(cap))),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, filter: &Filter) -> Option<Arc<RoaringBitmap>> {
        let cache = self.cache.as_ref()?;
        match cache.lock().get(filter) {
            Some(docs) => {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Some(docs.clone())
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, filter: Filter, docs: Arc<RoaringBitmap>) {
        if let Some(cache) = &self.cache {
            cache.lock().put(filter, docs);
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.as_ref().map_or(0, |cache| cache.lock().len()),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
