use std::collections::BTreeSet;
use crate::acl::privilege::{PrincipalType, Privilege};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Term;
use crate::filter::filter::{BooleanFilter, Filter, TermsFilter};
use crate::query::ast::{AclPrivilegeQuery, TermOperator};
use crate::query::builders::{terms_filter, BuildContext};
use crate::schema::field_names::{self, FieldName, FieldNames};

/// ACL fields consulted for `privilege`, or for every privilege when `None`.
///
/// With `include_super_privileges` an entry granting a stronger privilege
/// also satisfies the predicate.
pub fn acl_fields(privilege: Option<Privilege>, include_super_privileges: bool) -> BTreeSet<FieldName> {
    let privileges: BTreeSet<Privilege> = match privilege {
        None => Privilege::VALUES.into_iter().collect(),
        Some(p) if include_super_privileges => p.with_super_privileges().iter().copied().collect(),
        Some(p) => BTreeSet::from([p]),
    };

    privileges
        .into_iter()
        .flat_map(|p| PrincipalType::VALUES.into_iter().map(move |t| FieldNames::acl(p, t)))
        .collect()
}

pub fn build(ctx: &BuildContext, query: &AclPrivilegeQuery) -> Result<Filter> {
    let fields = acl_fields(query.privilege, query.include_super_privileges);

    match query.principal.as_deref() {
        Some(principal) => {
            let principal = principal.trim();
            if principal.is_empty() {
                return Err(Error::new(
                    ErrorKind::InvalidPrivilegeConfiguration,
                    "ACL predicate with an empty principal identifier",
                ));
            }
            let terms: TermsFilter = fields
                .into_iter()
                .map(|field| Term::from_text(field, principal))
                .collect();
            let positive = terms_filter(terms);
            if query.invert {
                ctx.invert(positive)
            } else {
                Ok(positive)
            }
        }
        // Any principal: presence of any entry, or absence of all when inverted
        None => {
            let mut filter = BooleanFilter::new();
            for field in fields {
                filter = if query.invert {
                    filter.with_must(ctx.invert(Filter::FieldPresent(field))?)
                } else {
                    filter.with_should(Filter::FieldPresent(field))
                };
            }
            Ok(Filter::Bool(filter))
        }
    }
}

/// Resources whose ACL is inherited from `resource_id`.
pub fn build_inherited_from(ctx: &BuildContext, resource_id: &str, op: TermOperator) -> Result<Filter> {
    let positive = Filter::Term(Term::from_text(
        FieldNames::system(field_names::ACL_INHERITED_FROM),
        resource_id,
    ));
    match op {
        TermOperator::Eq => Ok(positive),
        TermOperator::Ne => ctx.invert(positive),
        _ => Err(Error::unsupported_operator(op, "ACL inheritance")),
    }
}
