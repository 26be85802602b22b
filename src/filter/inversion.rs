use crate::filter::filter::{BooleanFilter, Filter};
use crate::filter::liveness::LivenessFilter;

/// Live documents not matched by `positive`: `live AND NOT positive`.
///
/// The inverted index keeps postings of deleted documents until they are
/// reclaimed, so the complement must be taken against the liveness filter and
/// never against all documents. Without a liveness filter the result degrades
/// to a bare complement that can return deleted documents.
pub fn invert(positive: Filter, liveness: Option<&LivenessFilter>) -> Filter {
    let base = match liveness {
        Some(live) => Filter::Live(live.clone()),
        None => Filter::MatchAll,
    };
    Filter::Bool(BooleanFilter::new().with_must(base).with_must_not(positive))
}
