use std::fmt;
use serde::{Serialize, Deserialize};

/// Property value types known to the resource repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    String,
    Html,
    Json,
    ImageRef,
    Boolean,
    Principal,
    Date,
    Timestamp,
    Int,
    Long,
}

/// How values of a property type are laid out in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEncoding {
    Text,  // UTF-8 bytes, lexical order
    Int,   // sortable 4-byte big endian
    Long,  // sortable 8-byte big endian (dates as epoch millis)
}

impl PropertyType {
    pub fn encoding(self) -> FieldEncoding {
        match self {
            PropertyType::String
            | PropertyType::Html
            | PropertyType::Json
            | PropertyType::ImageRef
            | PropertyType::Boolean
            | PropertyType::Principal => FieldEncoding::Text,
            PropertyType::Int => FieldEncoding::Int,
            PropertyType::Long | PropertyType::Date | PropertyType::Timestamp => FieldEncoding::Long,
        }
    }

    /// Only free-text types get a lower-cased sibling field.
    pub fn supports_case_folding(self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Html | PropertyType::Json | PropertyType::ImageRef
        )
    }

    /// Types whose range predicates are answered by byte-lexical term ranges.
    pub fn supports_lexical_range(self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Boolean | PropertyType::Principal
        )
    }

    /// Types that can be matched by prefix or wildcard patterns.
    pub fn supports_patterns(self) -> bool {
        matches!(
            self,
            PropertyType::String
                | PropertyType::Html
                | PropertyType::Json
                | PropertyType::ImageRef
                | PropertyType::Principal
        )
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PropertyType::String => "string",
            PropertyType::Html => "html",
            PropertyType::Json => "json",
            PropertyType::ImageRef => "image_ref",
            PropertyType::Boolean => "boolean",
            PropertyType::Principal => "principal",
            PropertyType::Date => "date",
            PropertyType::Timestamp => "timestamp",
            PropertyType::Int => "int",
            PropertyType::Long => "long",
        };
        f.write_str(name)
    }
}

/// Property definition as declared by the resource type schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyTypeDefinition {
    pub prefix: Option<String>,  // Namespace prefix, None for the default namespace
    pub name: String,
    pub property_type: PropertyType,
}

impl PropertyTypeDefinition {
    pub fn new(name: &str, property_type: PropertyType) -> Self {
        PropertyTypeDefinition {
            prefix: None,
            name: name.to_string(),
            property_type,
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }
}
