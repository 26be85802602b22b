use std::fmt;
use serde::{Serialize, Deserialize};
use crate::schema::field_names::FieldName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u32);

impl DocId {
    pub fn new(id: u32) -> Self {
        DocId(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

/// A (field, encoded value) pair identifying one indexable atom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    field: FieldName,
    bytes: Vec<u8>,
}

impl Term {
    pub fn new(field: FieldName, bytes: impl Into<Vec<u8>>) -> Self {
        Term { field, bytes: bytes.into() }
    }

    pub fn from_text(field: FieldName, text: &str) -> Self {
        Term::new(field, text.as_bytes())
    }

    pub fn field(&self) -> &FieldName {
        &self.field
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => write!(f, "{}:{}", self.field, text),
            Err(_) => write!(f, "{}:{:02x?}", self.field, self.bytes),
        }
    }
}
