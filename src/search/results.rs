use std::collections::BinaryHeap;
use std::cmp::Ordering;
use crate::core::types::DocId;

/// Search results container
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub hits: Vec<ScoredDocument>,
    pub total_hits: usize,
    pub max_score: f32,
    pub took_ms: u64,
}

impl SearchResults {
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|hit| hit.doc_id).collect()
    }
}

/// Document with relevance score
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f32,
}

impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Better hits order first: higher score, then lower doc id
impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Top-K collector; the heap top is the weakest hit kept so far
pub struct TopKCollector {
    heap: BinaryHeap<ScoredDocument>,
    k: usize,
    total_collected: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k + 1),
            k,
            total_collected: 0,
        }
    }

    pub fn collect(&mut self, scored_doc: ScoredDocument) {
        self.total_collected += 1;
        if self.k == 0 {
            return;
        }

        if self.heap.len() < self.k {
            self.heap.push(scored_doc);
        } else if self.heap.peek().is_some_and(|weakest| scored_doc < *weakest) {
            self.heap.pop();
            self.heap.push(scored_doc);
        }
    }

    pub fn total_collected(&self) -> usize {
        self.total_collected
    }

    pub fn get_results(self) -> Vec<ScoredDocument> {
        self.heap.into_sorted_vec()
    }
}
