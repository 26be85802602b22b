use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::time::Instant;
use roaring::RoaringBitmap;
use tracing::{debug, trace};
use crate::codec::value::ValueCodec;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::filter::filter::{CompiledQuery, Filter, NumericKind, NumericRange, Occur, TermRange};
use crate::index::snapshot::Snapshot;
use crate::search::cache::{CacheStats, FilterCache};
use crate::search::results::{ScoredDocument, SearchResults, TopKCollector};

/// Executes compiled queries against one snapshot.
///
/// Evaluation reads physical postings; deleted documents only drop out when
/// the query carries a liveness filter or `exclude_deleted_hits` is set. A
/// liveness filter also drops documents deleted in the searched snapshot, so
/// queries compiled before a delete stay correct.
pub struct Searcher {
    snapshot: Arc<Snapshot>,
    exclude_deleted_hits: bool,
    cache: FilterCache,
}

impl Searcher {
    pub fn new(snapshot: Arc<Snapshot>, config: &Config) -> Self {
        Searcher {
            snapshot,
            exclude_deleted_hits: config.exclude_deleted_hits,
            cache: FilterCache::new(config.filter_cache_size),
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn search(&self, query: &CompiledQuery, limit: usize) -> Result<SearchResults> {
        let start = Instant::now();
        let scores = self.matches(query)?;

        let mut collector = TopKCollector::new(limit);
        let mut max_score = 0.0f32;
        for (&doc, &score) in &scores {
            max_score = max_score.max(score);
            collector.collect(ScoredDocument { doc_id: DocId(doc), score });
        }
        let total_hits = collector.total_collected();
        let hits = collector.get_results();

        debug!(query = %query, total_hits, returned = hits.len(), "search finished");
        Ok(SearchResults {
            hits,
            total_hits,
            max_score,
            took_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Every matching document in id order.
    pub fn doc_ids(&self, query: &CompiledQuery) -> Result<Vec<DocId>> {
        Ok(self.matches(query)?.into_keys().map(DocId).collect())
    }

    pub fn count(&self, query: &CompiledQuery) -> Result<usize> {
        Ok(self.matches(query)?.len())
    }

    fn matches(&self, query: &CompiledQuery) -> Result<BTreeMap<u32, f32>> {
        let mut scores = self.score(query)?;
        if self.exclude_deleted_hits {
            scores.retain(|doc, _| !self.snapshot.deleted_docs.contains(*doc));
        }
        Ok(scores)
    }

    fn score(&self, query: &CompiledQuery) -> Result<BTreeMap<u32, f32>> {
        match query {
            CompiledQuery::Term(term) => Ok(self
                .snapshot
                .index
                .lookup(term)
                .map(|docs| docs.iter().map(|doc| (doc, 1.0)).collect())
                .unwrap_or_default()),
            CompiledQuery::ConstantScore { filter, boost } => {
                let docs = self.cached_filter(filter)?;
                Ok(docs.iter().map(|doc| (doc, *boost)).collect())
            }
            CompiledQuery::Boolean(boolean) => {
                let mut must: Option<BTreeMap<u32, f32>> = None;
                let mut should: Vec<BTreeMap<u32, f32>> = Vec::new();

                for (occur, clause) in &boolean.clauses {
                    let clause_scores = self.score(clause)?;
                    match occur {
                        Occur::Must => {
                            must = Some(match must {
                                None => clause_scores,
                                Some(mut acc) => {
                                    acc.retain(|doc, _| clause_scores.contains_key(doc));
                                    for (doc, score) in acc.iter_mut() {
                                        *score += clause_scores[doc];
                                    }
                                    acc
                                }
                            });
                        }
                        Occur::Should => should.push(clause_scores),
                    }
                }

                // Without required clauses at least one optional clause must match
                let mut result = match must {
                    Some(acc) => acc,
                    None => {
                        let mut union = BTreeMap::new();
                        for clause_scores in &should {
                            for &doc in clause_scores.keys() {
                                union.insert(doc, 0.0);
                            }
                        }
                        union
                    }
                };
                for clause_scores in &should {
                    for (doc, score) in result.iter_mut() {
                        if let Some(s) = clause_scores.get(doc) {
                            *score += s;
                        }
                    }
                }
                Ok(result)
            }
        }
    }

    fn cached_filter(&self, filter: &Filter) -> Result<Arc<RoaringBitmap>> {
        if let Some(docs) = self.cache.get(filter) {
            return Ok(docs);
        }
        let docs = Arc::new(self.evaluate(filter)?);
        self.cache.put(filter.clone(), docs.clone());
        Ok(docs)
    }

    /// Documents matched by `filter`, deleted ones included unless it says otherwise.
    pub fn evaluate(&self, filter: &Filter) -> Result<RoaringBitmap> {
        let index = &self.snapshot.index;
        let docs = match filter {
            Filter::MatchAll => index.all_docs(),
            Filter::Live(live) => {
                if live.generation() != self.snapshot.generation {
                    return Err(Error::new(
                        ErrorKind::StaleLiveness,
                        format!(
                            "liveness filter of index generation {} used on generation {}",
                            live.generation(),
                            self.snapshot.generation
                        ),
                    ));
                }
                // Deletions published after compilation count too
                index.all_docs() - live.deleted() - &*self.snapshot.deleted_docs
            }
            Filter::Term(term) => index.lookup(term).cloned().unwrap_or_default(),
            Filter::Terms(terms) => {
                let mut docs = RoaringBitmap::new();
                for term in &terms.terms {
                    if let Some(postings) = index.lookup(term) {
                        docs |= postings;
                    }
                }
                docs
            }
            Filter::TermRange(range) => evaluate_term_range(self, range),
            Filter::NumericRange(range) => evaluate_numeric_range(self, range)?,
            Filter::Wildcard(w) => index.wildcard(&w.field, &w.pattern)?,
            Filter::Prefix(p) => index.prefix(&p.field, &p.prefix),
            Filter::FieldPresent(field) => index.docs_with_field(field),
            Filter::Bool(b) => {
                if b.must.is_empty() && b.should.is_empty() {
                    return Ok(RoaringBitmap::new());
                }
                let mut acc: Option<RoaringBitmap> = None;
                for clause in &b.must {
                    let docs = self.evaluate(clause)?;
                    acc = Some(match acc {
                        None => docs,
                        Some(current) => current & docs,
                    });
                }
                if !b.should.is_empty() {
                    let mut union = RoaringBitmap::new();
                    for clause in &b.should {
                        union |= self.evaluate(clause)?;
                    }
                    acc = Some(match acc {
                        None => union,
                        Some(current) => current & union,
                    });
                }
                let mut docs = acc.unwrap_or_default();
                for clause in &b.must_not {
                    docs -= self.evaluate(clause)?;
                }
                docs
            }
        };

        trace!(filter = %filter, matched = docs.len(), "evaluated filter");
        Ok(docs)
    }
}

fn evaluate_term_range(searcher: &Searcher, range: &TermRange) -> RoaringBitmap {
    let bound = |value: &Option<Vec<u8>>, inclusive: bool| -> Bound<Vec<u8>> {
        match value {
            Some(bytes) if inclusive => Bound::Included(bytes.clone()),
            Some(bytes) => Bound::Excluded(bytes.clone()),
            None => Bound::Unbounded,
        }
    };
    let lower = bound(&range.lower, range.include_lower);
    let upper = bound(&range.upper, range.include_upper);
    searcher
        .snapshot
        .index
        .range(&range.field, as_slice(&lower), as_slice(&upper))
}

fn evaluate_numeric_range(searcher: &Searcher, range: &NumericRange) -> Result<RoaringBitmap> {
    let encode = |value: i64| -> Result<Vec<u8>> {
        match range.kind {
            NumericKind::Long => Ok(ValueCodec::encode_long(value).to_vec()),
            NumericKind::Int => i32::try_from(value)
                .map(|v| ValueCodec::encode_int(v).to_vec())
                .map_err(|_| {
                    Error::new(
                        ErrorKind::InvalidInput,
                        format!("int range bound {} on {} is out of range", value, range.field),
                    )
                }),
        }
    };
    let bound = |value: Option<i64>, inclusive: bool| -> Result<Bound<Vec<u8>>> {
        Ok(match value {
            Some(v) if inclusive => Bound::Included(encode(v)?),
            Some(v) => Bound::Excluded(encode(v)?),
            None => Bound::Unbounded,
        })
    };
    let lower = bound(range.lower, range.include_lower)?;
    let upper = bound(range.upper, range.include_upper)?;
    Ok(searcher
        .snapshot
        .index
        .range(&range.field, as_slice(&lower), as_slice(&upper)))
}

fn as_slice(bound: &Bound<Vec<u8>>) -> Bound<&[u8]> {
    match bound {
        Bound::Included(bytes) => Bound::Included(bytes.as_slice()),
        Bound::Excluded(bytes) => Bound::Excluded(bytes.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    }
}
