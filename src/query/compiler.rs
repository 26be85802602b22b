use std::sync::Arc;
use tracing::debug;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::filter::filter::{BooleanQuery, CompiledQuery, Filter, Occur};
use crate::filter::liveness::LivenessFilterProvider;
use crate::query::ast::Query;
use crate::query::builders::range::Bounds;
use crate::query::builders::{acl, hierarchical, range, term, uri, wildcard, BuildContext, ResolvedField};
use crate::query::validator::{QueryValidator, ValidationConfig};
use crate::schema::field_names::FieldName;
use crate::vocabulary::hierarchical::VocabularyRegistry;

/// Turns algebra trees into executable queries.
///
/// Holds only read-only shared state, so one compiler can serve concurrent
/// requests. Every call fetches the liveness filter anew (at most once).
pub struct QueryCompiler {
    config: Config,
    vocabularies: Arc<VocabularyRegistry>,
    liveness: Arc<dyn LivenessFilterProvider>,
    validator: QueryValidator,
}

impl QueryCompiler {
    pub fn new(config: Config, liveness: Arc<dyn LivenessFilterProvider>) -> Self {
        let validator = QueryValidator::new(ValidationConfig::from(&config));
        QueryCompiler {
            config,
            vocabularies: Arc::new(VocabularyRegistry::new()),
            liveness,
            validator,
        }
    }

    pub fn with_vocabularies(mut self, vocabularies: Arc<VocabularyRegistry>) -> Self {
        self.vocabularies = vocabularies;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compile a whole tree; the first failing node aborts compilation.
    pub fn compile(&self, query: &Query) -> Result<CompiledQuery> {
        self.validator.validate(query)?;
        let ctx = BuildContext::new(&self.config, self.liveness.as_ref(), &self.vocabularies);
        let compiled = self.compile_node(&ctx, query)?;
        debug!(kind = query.kind(), compiled = %compiled, "compiled query");
        Ok(compiled)
    }

    fn compile_node(&self, ctx: &BuildContext, query: &Query) -> Result<CompiledQuery> {
        debug!(kind = query.kind(), "compiling node");

        let compiled = match query {
            Query::Term(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                if q.op.is_case_insensitive() {
                    term::build(ctx, &field, q.op, &q.value.to_lowercase())?
                } else {
                    term::build(ctx, &field, q.op, &q.value)?
                }
            }
            Query::Range(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                let bounds = Bounds::between(q.from.as_deref(), q.to.as_deref(), q.inclusive);
                CompiledQuery::constant_score(range::build(&field, bounds)?)
            }
            Query::Wildcard(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                CompiledQuery::constant_score(wildcard::build_wildcard(ctx, &field, q.op, &q.pattern)?)
            }
            Query::Prefix(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                CompiledQuery::constant_score(wildcard::build_prefix(ctx, &field, q.op, &q.prefix)?)
            }
            Query::UriPrefix(q) => CompiledQuery::constant_score(uri::build_prefix(ctx, q)?),
            Query::AclPrivilege(q) => CompiledQuery::constant_score(acl::build(ctx, q)?),
            Query::AclInheritedFrom(q) => {
                CompiledQuery::constant_score(acl::build_inherited_from(ctx, &q.resource_id, q.op)?)
            }
            Query::HierarchicalTerm(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                CompiledQuery::constant_score(hierarchical::build(ctx, &field, &q.vocabulary, q.op, &q.term)?)
            }
            Query::TermSet(q) => {
                let field = FieldName::from(q.field.as_str());
                CompiledQuery::constant_score(term::build_set(ctx, &field, q.value_type, &q.values, q.op)?)
            }
            Query::UriSet(q) => CompiledQuery::constant_score(uri::build_set(ctx, &q.uris, q.op)?),
            Query::PropertyExists(q) => {
                let field = ResolvedField::resolve(&q.field)?;
                let present = Filter::FieldPresent(field.name);
                if q.inverted {
                    CompiledQuery::constant_score(ctx.invert(present)?)
                } else {
                    CompiledQuery::constant_score(present)
                }
            }
            Query::And(clauses) => self.compile_boolean(ctx, clauses, Occur::Must)?,
            Query::Or(clauses) => self.compile_boolean(ctx, clauses, Occur::Should)?,
            Query::MatchAll => CompiledQuery::constant_score(ctx.all_documents()?),
        };

        Ok(compiled)
    }

    fn compile_boolean(&self, ctx: &BuildContext, clauses: &[Query], occur: Occur) -> Result<CompiledQuery> {
        let clauses = clauses
            .iter()
            .map(|clause| Ok((occur, self.compile_node(ctx, clause)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(CompiledQuery::Boolean(BooleanQuery { clauses }))
    }
}
