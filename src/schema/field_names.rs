use std::fmt;
use serde::{Serialize, Deserialize};
use crate::acl::privilege::{PrincipalType, Privilege};
use crate::schema::property::PropertyTypeDefinition;

/// Bumped on any change below; indexes written with another version must be rebuilt.
pub const FIELD_NAMING_VERSION: u32 = 2;

// System fields written by the indexer for every resource
pub const NAME: &str = "name";
pub const NAME_LC: &str = "name_lc";
pub const URI: &str = "uri";
pub const ID: &str = "id";
pub const ANCESTOR_IDS: &str = "ancestorIds";
pub const ACL_INHERITED_FROM: &str = "aclInheritedFrom";
pub const RESOURCE_TYPE: &str = "resourceType";

const PROPERTY_PREFIX: &str = "p_";
const PREFIX_SEPARATOR: char = ':';
const ATTRIBUTE_SEPARATOR: char = '@';
const LOWERCASE_SUFFIX: &str = "_lc";
const ACL_PREFIX: &str = "acl_";

/// Opaque index field key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Self {
        FieldName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        FieldName(name.to_string())
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        FieldName(name)
    }
}

/// Naming functions shared by the indexer (writes) and the query compiler (reads).
pub struct FieldNames;

impl FieldNames {
    /// `p_[prefix:]name[@attribute][_lc]`
    ///
    /// Separator characters inside the components are percent-escaped, so no
    /// two definitions share a field.
    pub fn property(
        definition: &PropertyTypeDefinition,
        attribute: Option<&str>,
        lowercase: bool,
    ) -> FieldName {
        let mut name = String::from(PROPERTY_PREFIX);
        if let Some(prefix) = &definition.prefix {
            push_escaped(&mut name, prefix);
            name.push(PREFIX_SEPARATOR);
        }
        push_escaped(&mut name, &definition.name);
        if let Some(attribute) = attribute {
            name.push(ATTRIBUTE_SEPARATOR);
            push_escaped(&mut name, attribute);
        }
        if lowercase {
            name.push_str(LOWERCASE_SUFFIX);
        }
        FieldName(name)
    }

    /// `acl_<privilege>_<u|g>`
    pub fn acl(privilege: Privilege, principal_type: PrincipalType) -> FieldName {
        let suffix = match principal_type {
            PrincipalType::User => "u",
            PrincipalType::Group => "g",
        };
        FieldName(format!("{}{}_{}", ACL_PREFIX, privilege.name(), suffix))
    }

    pub fn system(name: &str) -> FieldName {
        FieldName::from(name)
    }
}

fn push_escaped(out: &mut String, component: &str) {
    for c in component.chars() {
        match c {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '@' => out.push_str("%40"),
            '_' => out.push_str("%5F"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::property::PropertyType;

    #[test]
    fn property_names_are_deterministic() {
        let title = PropertyTypeDefinition::new("title", PropertyType::String);
        assert_eq!(FieldNames::property(&title, None, false).as_str(), "p_title");
        assert_eq!(FieldNames::property(&title, None, true).as_str(), "p_title_lc");
        assert_eq!(
            FieldNames::property(&title, None, true),
            FieldNames::property(&title.clone(), None, true)
        );
    }

    #[test]
    fn prefixed_json_attribute() {
        let def = PropertyTypeDefinition::new("meta", PropertyType::Json).with_prefix("resource");
        assert_eq!(
            FieldNames::property(&def, Some("author.name"), true).as_str(),
            "p_resource:meta@author.name_lc"
        );
    }

    #[test]
    fn property_fields_never_collide_with_system_fields() {
        let def = PropertyTypeDefinition::new("name", PropertyType::String);
        assert_ne!(FieldNames::property(&def, None, false), FieldNames::system(NAME));
        assert_ne!(FieldNames::property(&def, None, true), FieldNames::system(NAME_LC));
    }

    #[test]
    fn property_fields_never_collide_with_each_other() {
        let title = PropertyTypeDefinition::new("title", PropertyType::String);
        let title_lc = PropertyTypeDefinition::new("title_lc", PropertyType::String);
        assert_ne!(
            FieldNames::property(&title, None, true),
            FieldNames::property(&title_lc, None, false)
        );
        assert_eq!(FieldNames::property(&title_lc, None, false).as_str(), "p_title%5Flc");

        let meta = PropertyTypeDefinition::new("meta", PropertyType::Json);
        let meta_at = PropertyTypeDefinition::new("meta@x", PropertyType::Json);
        assert_ne!(
            FieldNames::property(&meta, Some("x"), false),
            FieldNames::property(&meta_at, None, false)
        );

        let nested = PropertyTypeDefinition::new("b:c", PropertyType::String).with_prefix("a");
        let prefixed = PropertyTypeDefinition::new("c", PropertyType::String).with_prefix("a:b");
        assert_ne!(
            FieldNames::property(&nested, None, false),
            FieldNames::property(&prefixed, None, false)
        );

        let literal = PropertyTypeDefinition::new("a%40b", PropertyType::String);
        let escaped = PropertyTypeDefinition::new("a@b", PropertyType::String);
        assert_ne!(
            FieldNames::property(&literal, None, false),
            FieldNames::property(&escaped, None, false)
        );
    }

    #[test]
    fn acl_field_per_privilege_and_principal_type() {
        assert_eq!(
            FieldNames::acl(Privilege::ReadWrite, PrincipalType::User).as_str(),
            "acl_read-write_u"
        );
        assert_eq!(
            FieldNames::acl(Privilege::Read, PrincipalType::Group).as_str(),
            "acl_read_g"
        );
    }
}
