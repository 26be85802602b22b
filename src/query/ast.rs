use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::acl::privilege::Privilege;
use crate::core::error::{Error, ErrorKind};
use crate::schema::property::{PropertyType, PropertyTypeDefinition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermOperator {
    Eq,
    Ne,
    EqIcase,
    NeIcase,
    Ge,
    Gt,
    Le,
    Lt,
    In,
    Ni,
}

impl TermOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            TermOperator::Eq => "=",
            TermOperator::Ne => "!=",
            TermOperator::EqIcase => "=~",
            TermOperator::NeIcase => "!=~",
            TermOperator::Ge => ">=",
            TermOperator::Gt => ">",
            TermOperator::Le => "<=",
            TermOperator::Lt => "<",
            TermOperator::In => "IN",
            TermOperator::Ni => "NI",
        }
    }

    pub fn is_negated(self) -> bool {
        matches!(self, TermOperator::Ne | TermOperator::NeIcase | TermOperator::Ni)
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(self, TermOperator::EqIcase | TermOperator::NeIcase)
    }
}

impl fmt::Display for TermOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TermOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [TermOperator; 10] = [
            TermOperator::Eq,
            TermOperator::Ne,
            TermOperator::EqIcase,
            TermOperator::NeIcase,
            TermOperator::Ge,
            TermOperator::Gt,
            TermOperator::Le,
            TermOperator::Lt,
            TermOperator::In,
            TermOperator::Ni,
        ];
        ALL.iter()
            .copied()
            .find(|op| op.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::new(ErrorKind::Parse, format!("unknown operator '{}'", s)))
    }
}

/// What a predicate is evaluated against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRef {
    Name,
    Uri,
    ResourceType,
    Property {
        definition: PropertyTypeDefinition,
        attribute: Option<String>,  // JSON attribute path
    },
}

impl FieldRef {
    pub fn property(definition: PropertyTypeDefinition) -> Self {
        FieldRef::Property { definition, attribute: None }
    }

    pub fn json_attribute(definition: PropertyTypeDefinition, attribute: &str) -> Self {
        FieldRef::Property {
            definition,
            attribute: Some(attribute.to_string()),
        }
    }
}

/// Query algebra produced by the external parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Term(TermQuery),
    Range(RangeQuery),
    Wildcard(WildcardQuery),
    Prefix(PrefixQuery),
    UriPrefix(UriPrefixQuery),
    AclPrivilege(AclPrivilegeQuery),
    AclInheritedFrom(AclInheritedFromQuery),
    HierarchicalTerm(HierarchicalTermQuery),
    TermSet(TermSetQuery),
    UriSet(UriSetQuery),
    PropertyExists(PropertyExistsQuery),
    And(Vec<Query>),
    Or(Vec<Query>),
    MatchAll,
}

/// Single value comparison: equality or one-sided ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermQuery {
    pub field: FieldRef,
    pub op: TermOperator,
    pub value: String,
}

/// Two-sided range; at least one bound must be set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    pub field: FieldRef,
    pub from: Option<String>,
    pub to: Option<String>,
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardQuery {
    pub field: FieldRef,
    pub pattern: String,  // Pattern with wildcards (* and ?)
    pub op: TermOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixQuery {
    pub field: FieldRef,
    pub prefix: String,
    pub op: TermOperator,
}

/// Subtree membership by ancestor ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriPrefixQuery {
    pub uri: String,
    pub op: TermOperator,
    pub candidate_ids: Vec<String>,  // Id of `uri` for EQ/NE, subtree roots for IN/NI
    pub self_excluded: bool,
}

/// `privilege: None` means any privilege, `principal: None` any principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclPrivilegeQuery {
    pub privilege: Option<Privilege>,
    pub principal: Option<String>,
    pub invert: bool,
    pub include_super_privileges: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclInheritedFromQuery {
    pub resource_id: String,
    pub op: TermOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchicalTermQuery {
    pub vocabulary: String,
    pub op: TermOperator,
    pub field: FieldRef,
    pub term: String,
}

/// Membership in a literal set on a named field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSetQuery {
    pub field: String,
    pub values: Vec<String>,
    pub value_type: PropertyType,
    pub op: TermOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriSetQuery {
    pub uris: Vec<String>,
    pub op: TermOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyExistsQuery {
    pub field: FieldRef,
    pub inverted: bool,
}

impl Query {
    pub fn term(field: FieldRef, op: TermOperator, value: &str) -> Self {
        Query::Term(TermQuery {
            field,
            op,
            value: value.to_string(),
        })
    }

    pub fn name(op: TermOperator, value: &str) -> Self {
        Query::term(FieldRef::Name, op, value)
    }

    pub fn wildcard(field: FieldRef, op: TermOperator, pattern: &str) -> Self {
        Query::Wildcard(WildcardQuery {
            field,
            pattern: pattern.to_string(),
            op,
        })
    }

    pub fn prefix(field: FieldRef, op: TermOperator, prefix: &str) -> Self {
        Query::Prefix(PrefixQuery {
            field,
            prefix: prefix.to_string(),
            op,
        })
    }

    pub fn uri_prefix(uri: &str, op: TermOperator, candidate_ids: &[&str], self_excluded: bool) -> Self {
        Query::UriPrefix(UriPrefixQuery {
            uri: uri.to_string(),
            op,
            candidate_ids: candidate_ids.iter().map(|id| id.to_string()).collect(),
            self_excluded,
        })
    }

    pub fn acl(
        privilege: Option<Privilege>,
        principal: Option<&str>,
        invert: bool,
        include_super_privileges: bool,
    ) -> Self {
        Query::AclPrivilege(AclPrivilegeQuery {
            privilege,
            principal: principal.map(str::to_string),
            invert,
            include_super_privileges,
        })
    }

    pub fn hierarchical(vocabulary: &str, op: TermOperator, field: FieldRef, term: &str) -> Self {
        Query::HierarchicalTerm(HierarchicalTermQuery {
            vocabulary: vocabulary.to_string(),
            op,
            field,
            term: term.to_string(),
        })
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Term(_) => "term",
            Query::Range(_) => "range",
            Query::Wildcard(_) => "wildcard",
            Query::Prefix(_) => "prefix",
            Query::UriPrefix(_) => "uri_prefix",
            Query::AclPrivilege(_) => "acl_privilege",
            Query::AclInheritedFrom(_) => "acl_inherited_from",
            Query::HierarchicalTerm(_) => "hierarchical_term",
            Query::TermSet(_) => "term_set",
            Query::UriSet(_) => "uri_set",
            Query::PropertyExists(_) => "property_exists",
            Query::And(_) => "and",
            Query::Or(_) => "or",
            Query::MatchAll => "match_all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_symbols_round_trip() {
        assert_eq!("!=~".parse::<TermOperator>().unwrap(), TermOperator::NeIcase);
        assert_eq!("in".parse::<TermOperator>().unwrap(), TermOperator::In);
        assert_eq!(TermOperator::Ge.to_string(), ">=");
        assert!("<>".parse::<TermOperator>().is_err());
    }

    #[test]
    fn negation_flags() {
        assert!(TermOperator::Ni.is_negated());
        assert!(TermOperator::NeIcase.is_negated());
        assert!(!TermOperator::Lt.is_negated());
        assert!(TermOperator::EqIcase.is_case_insensitive());
    }

    #[test]
    fn algebra_deserializes_from_json() {
        let json = r#"{
            "and": [
                { "term": { "field": "name", "op": "NE", "value": "index.html" } },
                { "acl_privilege": {
                    "privilege": "read",
                    "principal": "alice",
                    "invert": false,
                    "include_super_privileges": true } }
            ]
        }"#;
        let query: Query = serde_json::from_str(json).unwrap();
        assert_eq!(
            query,
            Query::And(vec![
                Query::name(TermOperator::Ne, "index.html"),
                Query::acl(Some(Privilege::Read), Some("alice"), false, true),
            ])
        );
    }
}
