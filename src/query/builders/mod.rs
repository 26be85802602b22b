pub mod term;
pub mod range;
pub mod wildcard;
pub mod hierarchical;
pub mod acl;
pub mod uri;

use std::cell::OnceCell;
use tracing::warn;
use crate::codec::value::ValueCodec;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Term;
use crate::filter::filter::{Filter, TermsFilter};
use crate::filter::inversion::invert;
use crate::filter::liveness::{LivenessFilter, LivenessFilterProvider};
use crate::query::ast::{FieldRef, TermOperator};
use crate::schema::field_names::{self, FieldName, FieldNames};
use crate::schema::property::{FieldEncoding, PropertyType};
use crate::vocabulary::hierarchical::VocabularyRegistry;

/// Inputs shared by every builder during one compilation
pub struct BuildContext<'a> {
    config: &'a Config,
    liveness_provider: &'a dyn LivenessFilterProvider,
    vocabularies: &'a VocabularyRegistry,
    liveness: OnceCell<Option<LivenessFilter>>,  // Fetched on first negation only
}

impl<'a> BuildContext<'a> {
    pub fn new(
        config: &'a Config,
        liveness_provider: &'a dyn LivenessFilterProvider,
        vocabularies: &'a VocabularyRegistry,
    ) -> Self {
        BuildContext {
            config,
            liveness_provider,
            vocabularies,
            liveness: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn vocabularies(&self) -> &VocabularyRegistry {
        self.vocabularies
    }

    pub fn liveness(&self) -> Option<&LivenessFilter> {
        self.liveness
            .get_or_init(|| self.liveness_provider.liveness_filter())
            .as_ref()
    }

    /// Live documents not matching `positive`.
    pub fn invert(&self, positive: Filter) -> Result<Filter> {
        match self.liveness() {
            Some(live) => Ok(invert(positive, Some(live))),
            None if self.config.require_liveness => Err(Error::new(
                ErrorKind::MissingLiveness,
                format!("negation of {} needs a liveness filter", positive),
            )),
            None => {
                warn!(filter = %positive, "inverting without liveness filter, deleted documents may match");
                Ok(invert(positive, None))
            }
        }
    }

    /// Every live document. Without a liveness filter this follows the same
    /// contract as `invert`.
    pub fn all_documents(&self) -> Result<Filter> {
        match self.liveness() {
            Some(live) => Ok(Filter::Live(live.clone())),
            None if self.config.require_liveness => Err(Error::new(
                ErrorKind::MissingLiveness,
                "match-all needs a liveness filter",
            )),
            None => {
                warn!("match-all without liveness filter, deleted documents may match");
                Ok(Filter::MatchAll)
            }
        }
    }
}

/// Index field(s) behind a `FieldRef`
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: FieldName,
    pub lowercase: Option<FieldName>,
    pub property_type: PropertyType,
}

impl ResolvedField {
    pub fn resolve(field: &FieldRef) -> Result<Self> {
        let resolved = match field {
            FieldRef::Name => ResolvedField {
                name: FieldNames::system(field_names::NAME),
                lowercase: Some(FieldNames::system(field_names::NAME_LC)),
                property_type: PropertyType::String,
            },
            FieldRef::Uri => ResolvedField {
                name: FieldNames::system(field_names::URI),
                lowercase: None,
                property_type: PropertyType::String,
            },
            FieldRef::ResourceType => ResolvedField {
                name: FieldNames::system(field_names::RESOURCE_TYPE),
                lowercase: None,
                property_type: PropertyType::String,
            },
            FieldRef::Property { definition, attribute } => {
                if attribute.is_some() && definition.property_type != PropertyType::Json {
                    return Err(Error::unsupported_value_type(format!(
                        "attribute lookup on {} property '{}'",
                        definition.property_type, definition.name
                    )));
                }
                let attribute = attribute.as_deref();
                ResolvedField {
                    name: FieldNames::property(definition, attribute, false),
                    lowercase: definition
                        .property_type
                        .supports_case_folding()
                        .then(|| FieldNames::property(definition, attribute, true)),
                    property_type: definition.property_type,
                }
            }
        };
        Ok(resolved)
    }

    pub fn encoding(&self) -> FieldEncoding {
        self.property_type.encoding()
    }

    /// The case-folded variant for `*_ICASE` operators, the plain field otherwise.
    pub fn for_operator(&self, op: TermOperator) -> Result<&FieldName> {
        if !op.is_case_insensitive() {
            return Ok(&self.name);
        }
        self.lowercase.as_ref().ok_or_else(|| {
            Error::unsupported_value_type(format!(
                "field {} ({}) has no case-insensitive variant",
                self.name, self.property_type
            ))
        })
    }

    /// Encoded term for `literal` on the field selected by `op`.
    pub fn term(&self, op: TermOperator, literal: &str) -> Result<Term> {
        let field = self.for_operator(op)?.clone();
        let bytes = ValueCodec::encode_literal(self.property_type, literal)?;
        Ok(Term::new(field, bytes))
    }
}

/// A single-term set collapses to a plain term filter.
pub fn terms_filter(mut terms: TermsFilter) -> Filter {
    if terms.len() == 1 {
        if let Some(term) = terms.terms.pop_first() {
            return Filter::Term(term);
        }
    }
    Filter::Terms(terms)
}
