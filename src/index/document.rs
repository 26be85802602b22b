use std::collections::{BTreeMap, BTreeSet};
use crate::acl::privilege::{PrincipalType, Privilege};
use crate::codec::value::ValueCodec;
use crate::core::error::Result;
use crate::schema::field_names::{self, FieldName, FieldNames};
use crate::schema::property::PropertyTypeDefinition;

/// A resource as the indexer writes it: encoded terms per field.
///
/// Helpers go through the same naming and codec functions the compiler uses
/// to read, so written and queried terms always agree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexDocument {
    fields: BTreeMap<FieldName, BTreeSet<Vec<u8>>>,
}

impl IndexDocument {
    pub fn new() -> Self {
        IndexDocument {
            fields: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, field: FieldName, bytes: impl Into<Vec<u8>>) {
        self.fields.entry(field).or_default().insert(bytes.into());
    }

    pub fn with_text(mut self, field: &str, text: &str) -> Self {
        self.add(FieldName::from(field), text.as_bytes());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.add(FieldNames::system(field_names::NAME), name.as_bytes());
        self.add(FieldNames::system(field_names::NAME_LC), name.to_lowercase());
        self
    }

    /// URI, own id and the ids of every ancestor collection.
    pub fn with_uri(mut self, uri: &str, id: &str, ancestor_ids: &[&str]) -> Self {
        self.add(FieldNames::system(field_names::URI), uri.as_bytes());
        self.add(FieldNames::system(field_names::ID), id.as_bytes());
        for ancestor in ancestor_ids {
            self.add(FieldNames::system(field_names::ANCESTOR_IDS), ancestor.as_bytes());
        }
        self
    }

    pub fn with_resource_type(mut self, resource_type: &str) -> Self {
        self.add(FieldNames::system(field_names::RESOURCE_TYPE), resource_type.as_bytes());
        self
    }

    pub fn with_property(self, definition: &PropertyTypeDefinition, literal: &str) -> Result<Self> {
        self.with_property_value(definition, None, literal)
    }

    pub fn with_json_attribute(
        self,
        definition: &PropertyTypeDefinition,
        attribute: &str,
        literal: &str,
    ) -> Result<Self> {
        self.with_property_value(definition, Some(attribute), literal)
    }

    fn with_property_value(
        mut self,
        definition: &PropertyTypeDefinition,
        attribute: Option<&str>,
        literal: &str,
    ) -> Result<Self> {
        let property_type = definition.property_type;
        let bytes = ValueCodec::encode_literal(property_type, literal)?;
        self.add(FieldNames::property(definition, attribute, false), bytes);
        if property_type.supports_case_folding() {
            let folded = ValueCodec::encode_literal(property_type, &literal.to_lowercase())?;
            self.add(FieldNames::property(definition, attribute, true), folded);
        }
        Ok(self)
    }

    pub fn with_acl(mut self, privilege: Privilege, principal_type: PrincipalType, principal: &str) -> Self {
        self.add(FieldNames::acl(privilege, principal_type), principal.as_bytes());
        self
    }

    pub fn with_acl_inherited_from(mut self, resource_id: &str) -> Self {
        self.add(FieldNames::system(field_names::ACL_INHERITED_FROM), resource_id.as_bytes());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &BTreeSet<Vec<u8>>)> {
        self.fields.iter()
    }

    pub fn values(&self, field: &str) -> Option<&BTreeSet<Vec<u8>>> {
        self.fields.get(&FieldName::from(field))
    }
}
