use crate::codec::value::ValueCodec;
use crate::core::error::{Error, Result};
use crate::core::types::Term;
use crate::filter::filter::{CompiledQuery, Filter, TermsFilter};
use crate::query::ast::TermOperator;
use crate::query::builders::{range, terms_filter, BuildContext, ResolvedField};
use crate::schema::field_names::FieldName;
use crate::schema::property::PropertyType;

/// Equality and one-sided ordering on a single literal.
///
/// For `*_ICASE` operators the literal must already be lower-cased.
pub fn build(
    ctx: &BuildContext,
    field: &ResolvedField,
    op: TermOperator,
    literal: &str,
) -> Result<CompiledQuery> {
    match op {
        TermOperator::Eq | TermOperator::EqIcase => Ok(CompiledQuery::Term(field.term(op, literal)?)),
        TermOperator::Ne | TermOperator::NeIcase => {
            let positive = Filter::Term(field.term(op, literal)?);
            Ok(CompiledQuery::constant_score(ctx.invert(positive)?))
        }
        TermOperator::Ge | TermOperator::Gt | TermOperator::Le | TermOperator::Lt => {
            Ok(CompiledQuery::constant_score(range::build_one_sided(field, op, literal)?))
        }
        TermOperator::In | TermOperator::Ni => Err(Error::unsupported_operator(op, "term")),
    }
}

/// Membership of a raw field in a literal set: `IN` matches any, `NI` none.
pub fn build_set(
    ctx: &BuildContext,
    field: &FieldName,
    value_type: PropertyType,
    values: &[String],
    op: TermOperator,
) -> Result<Filter> {
    if !matches!(op, TermOperator::In | TermOperator::Ni) {
        return Err(Error::unsupported_operator(op, "term set"));
    }

    let terms = values
        .iter()
        .map(|value| Ok(Term::new(field.clone(), ValueCodec::encode_literal(value_type, value)?)))
        .collect::<Result<TermsFilter>>()?;
    let positive = terms_filter(terms);

    match op {
        TermOperator::Ni => ctx.invert(positive),
        _ => Ok(positive),
    }
}
