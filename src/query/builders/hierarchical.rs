use tracing::trace;
use crate::core::error::{Error, ErrorKind, Result};
use crate::filter::filter::{Filter, TermsFilter};
use crate::query::ast::TermOperator;
use crate::query::builders::{terms_filter, BuildContext, ResolvedField};

/// Vocabulary-aware membership: `IN` matches the term or anything below it.
pub fn build(
    ctx: &BuildContext,
    field: &ResolvedField,
    vocabulary: &str,
    op: TermOperator,
    term: &str,
) -> Result<Filter> {
    let vocab = ctx.vocabularies().get(vocabulary).ok_or_else(|| {
        Error::new(
            ErrorKind::UnknownVocabulary,
            format!("no vocabulary named '{}'", vocabulary),
        )
    })?;

    match op {
        TermOperator::Eq => Ok(Filter::Term(field.term(op, term)?)),
        TermOperator::Ne => ctx.invert(Filter::Term(field.term(op, term)?)),
        TermOperator::In | TermOperator::Ni => {
            let descendants = vocab.descendants(&term.to_string());
            trace!(vocabulary, term, expanded = descendants.len(), "expanded hierarchical term");

            let mut terms = TermsFilter::new();
            terms.insert(field.term(op, term)?);
            for descendant in &descendants {
                terms.insert(field.term(op, descendant)?);
            }
            let positive = terms_filter(terms);

            if op == TermOperator::Ni {
                ctx.invert(positive)
            } else {
                Ok(positive)
            }
        }
        _ => Err(Error::unsupported_operator(op, "hierarchical term")),
    }
}
