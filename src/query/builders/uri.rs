use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Term;
use crate::filter::filter::{BooleanFilter, Filter, TermsFilter};
use crate::query::ast::{TermOperator, UriPrefixQuery};
use crate::query::builders::{terms_filter, BuildContext};
use crate::schema::field_names::{self, FieldNames};

pub const ROOT_URI: &str = "/";
const SEPARATOR: char = '/';

/// Whether the prefix document itself belongs to the result.
///
/// A trailing separator asks for descendants only. The root never matches
/// itself, even when `self_excluded` is false.
pub fn includes_self(uri: &str, self_excluded: bool) -> bool {
    !self_excluded && uri != ROOT_URI && !uri.ends_with(SEPARATOR)
}

/// Subtree membership through the indexed ancestor ids.
pub fn build_prefix(ctx: &BuildContext, query: &UriPrefixQuery) -> Result<Filter> {
    if !query.uri.starts_with(SEPARATOR) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("URI '{}' is not absolute", query.uri),
        ));
    }

    match query.op {
        TermOperator::Eq | TermOperator::Ne => {
            let id = match query.candidate_ids.as_slice() {
                [id] => id,
                ids => {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!(
                            "URI prefix '{}' needs exactly one resource id, got {}",
                            query.uri,
                            ids.len()
                        ),
                    ))
                }
            };

            let below = Filter::Term(ancestor_term(id));
            let positive = if includes_self(&query.uri, query.self_excluded) {
                Filter::Bool(
                    BooleanFilter::new()
                        .with_should(below)
                        .with_should(Filter::Term(Term::from_text(
                            FieldNames::system(field_names::ID),
                            id,
                        ))),
                )
            } else {
                below
            };

            if query.op == TermOperator::Ne {
                ctx.invert(positive)
            } else {
                Ok(positive)
            }
        }
        TermOperator::In | TermOperator::Ni => {
            if query.candidate_ids.is_empty() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("URI prefix set '{}' has no resource ids", query.uri),
                ));
            }
            let terms: TermsFilter = query.candidate_ids.iter().map(|id| ancestor_term(id)).collect();
            let positive = terms_filter(terms);

            if query.op == TermOperator::Ni {
                ctx.invert(positive)
            } else {
                Ok(positive)
            }
        }
        op => Err(Error::unsupported_operator(op, "URI prefix")),
    }
}

/// Exact URI membership.
pub fn build_set(ctx: &BuildContext, uris: &[String], op: TermOperator) -> Result<Filter> {
    if !matches!(op, TermOperator::In | TermOperator::Ni) {
        return Err(Error::unsupported_operator(op, "URI set"));
    }

    let field = FieldNames::system(field_names::URI);
    let terms: TermsFilter = uris
        .iter()
        .map(|uri| Term::from_text(field.clone(), normalize(uri)))
        .collect();
    let positive = terms_filter(terms);

    if op == TermOperator::Ni {
        ctx.invert(positive)
    } else {
        Ok(positive)
    }
}

fn ancestor_term(id: &str) -> Term {
    Term::from_text(FieldNames::system(field_names::ANCESTOR_IDS), id)
}

// Stored URIs carry no trailing separator except the root
fn normalize(uri: &str) -> &str {
    match uri.trim_end_matches(SEPARATOR) {
        "" => ROOT_URI,
        trimmed => trimmed,
    }
}
