use crate::core::error::{Error, ErrorKind, Result};
use crate::filter::filter::{Filter, PrefixFilter, WildcardFilter};
use crate::query::ast::TermOperator;
use crate::query::builders::{BuildContext, ResolvedField};
use crate::schema::field_names::FieldName;

pub const WILDCARD_MANY: char = '*';
pub const WILDCARD_ONE: char = '?';

/// Wildcard pattern match, evaluated as a filter so no clause limit applies.
pub fn build_wildcard(
    ctx: &BuildContext,
    field: &ResolvedField,
    op: TermOperator,
    pattern: &str,
) -> Result<Filter> {
    let target = pattern_field(field, op, "wildcard")?;

    if !pattern.contains([WILDCARD_MANY, WILDCARD_ONE]) {
        return Err(Error::new(
            ErrorKind::InvalidPattern,
            format!("no wildcard characters in '{}'", pattern),
        ));
    }
    if !ctx.config().allow_leading_wildcard && pattern.starts_with([WILDCARD_MANY, WILDCARD_ONE]) {
        return Err(Error::new(
            ErrorKind::InvalidPattern,
            format!("leading wildcard in '{}' is not allowed", pattern),
        ));
    }

    let pattern = if op.is_case_insensitive() { pattern.to_lowercase() } else { pattern.to_string() };
    let positive = Filter::Wildcard(WildcardFilter { field: target, pattern });
    negate_if(ctx, op, positive)
}

pub fn build_prefix(
    ctx: &BuildContext,
    field: &ResolvedField,
    op: TermOperator,
    prefix: &str,
) -> Result<Filter> {
    let target = pattern_field(field, op, "prefix")?;
    let prefix = if op.is_case_insensitive() { prefix.to_lowercase() } else { prefix.to_string() };
    let positive = Filter::Prefix(PrefixFilter { field: target, prefix });
    negate_if(ctx, op, positive)
}

fn pattern_field(field: &ResolvedField, op: TermOperator, shape: &str) -> Result<FieldName> {
    if !matches!(
        op,
        TermOperator::Eq | TermOperator::Ne | TermOperator::EqIcase | TermOperator::NeIcase
    ) {
        return Err(Error::unsupported_operator(op, shape));
    }
    if !field.property_type.supports_patterns() {
        return Err(Error::unsupported_value_type(format!(
            "{} match on {} field {}",
            shape, field.property_type, field.name
        )));
    }
    Ok(field.for_operator(op)?.clone())
}

fn negate_if(ctx: &BuildContext, op: TermOperator, positive: Filter) -> Result<Filter> {
    if op.is_negated() {
        ctx.invert(positive)
    } else {
        Ok(positive)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use roaring::RoaringBitmap;
    use super::*;
    use crate::core::config::Config;
    use crate::filter::liveness::LivenessFilter;
    use crate::query::ast::FieldRef;
    use crate::schema::property::{PropertyType, PropertyTypeDefinition};
    use crate::vocabulary::hierarchical::VocabularyRegistry;

    fn run(config: Config, f: impl FnOnce(&BuildContext) -> Result<Filter>) -> Result<Filter> {
        let vocabularies = VocabularyRegistry::new();
        let liveness = LivenessFilter::new(1, Arc::new(RoaringBitmap::new()));
        let ctx = BuildContext::new(&config, &liveness, &vocabularies);
        f(&ctx)
    }

    fn title() -> ResolvedField {
        ResolvedField::resolve(&FieldRef::property(PropertyTypeDefinition::new("title", PropertyType::String))).unwrap()
    }

    #[test]
    fn pattern_without_metacharacters_is_rejected() {
        let field = title();
        let err = run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::Eq, "abc")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPattern);
        assert!(run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::Eq, "ab*")).is_ok());
        assert!(run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::Eq, "a?c")).is_ok());
    }

    #[test]
    fn leading_wildcard_policy() {
        let field = title();
        assert!(run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::Eq, "*.html")).is_ok());
        let strict = Config { allow_leading_wildcard: false, ..Config::default() };
        let err = run(strict, |ctx| build_wildcard(ctx, &field, TermOperator::Eq, "*.html")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPattern);
    }

    #[test]
    fn case_insensitive_lowercases_pattern() {
        let field = title();
        let filter = run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::EqIcase, "Read*")).unwrap();
        assert_eq!(
            filter,
            Filter::Wildcard(WildcardFilter { field: "p_title_lc".into(), pattern: "read*".into() })
        );
    }

    #[test]
    fn negated_prefix_is_inverted() {
        let field = title();
        let filter = run(Config::default(), |ctx| build_prefix(ctx, &field, TermOperator::Ne, "draft")).unwrap();
        match filter {
            Filter::Bool(b) => {
                assert!(matches!(b.must[0], Filter::Live(_)));
                assert_eq!(
                    b.must_not,
                    vec![Filter::Prefix(PrefixFilter { field: "p_title".into(), prefix: "draft".into() })]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn numbers_and_ordering_are_rejected() {
        let field = ResolvedField::resolve(&FieldRef::property(PropertyTypeDefinition::new("n", PropertyType::Int))).unwrap();
        let err = run(Config::default(), |ctx| build_prefix(ctx, &field, TermOperator::Eq, "1")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedValueType);

        let field = title();
        let err = run(Config::default(), |ctx| build_wildcard(ctx, &field, TermOperator::Gt, "a*")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperator);
    }
}
