use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use regex::Regex;
use roaring::RoaringBitmap;
use tracing::debug;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, Term};
use crate::index::document::IndexDocument;
use crate::schema::field_names::FieldName;

/// Term dictionary and postings of one field
#[derive(Debug)]
pub struct FieldIndex {
    dictionary: Map<Vec<u8>>,       // term bytes -> ordinal into `postings`
    postings: Vec<RoaringBitmap>,
    present: RoaringBitmap,         // docs with at least one term
}

impl FieldIndex {
    fn postings_for(&self, ordinal: u64) -> Option<&RoaringBitmap> {
        usize::try_from(ordinal).ok().and_then(|i| self.postings.get(i))
    }

    fn union_stream<S>(&self, mut stream: S) -> RoaringBitmap
    where
        S: for<'b> Streamer<'b, Item = (&'b [u8], u64)>,
    {
        let mut docs = RoaringBitmap::new();
        while let Some((_, ordinal)) = stream.next() {
            if let Some(postings) = self.postings_for(ordinal) {
                docs |= postings;
            }
        }
        docs
    }
}

/// Field-aware inverted index over physical documents.
///
/// Postings of deleted documents stay in place; deletions live in the
/// snapshot that publishes the index.
#[derive(Debug)]
pub struct InvertedIndex {
    fields: HashMap<FieldName, FieldIndex>,
    doc_count: u32,
}

impl InvertedIndex {
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    /// Every physically present document.
    pub fn all_docs(&self) -> RoaringBitmap {
        let mut docs = RoaringBitmap::new();
        docs.insert_range(0..self.doc_count);
        docs
    }

    pub fn field(&self, field: &FieldName) -> Option<&FieldIndex> {
        self.fields.get(field)
    }

    pub fn lookup(&self, term: &Term) -> Option<&RoaringBitmap> {
        let field = self.fields.get(term.field())?;
        let ordinal = field.dictionary.get(term.bytes())?;
        field.postings_for(ordinal)
    }

    pub fn docs_with_field(&self, field: &FieldName) -> RoaringBitmap {
        self.fields
            .get(field)
            .map(|f| f.present.clone())
            .unwrap_or_default()
    }

    /// Documents with a term between the bounds in byte-lexical order.
    pub fn range(&self, field: &FieldName, lower: Bound<&[u8]>, upper: Bound<&[u8]>) -> RoaringBitmap {
        let Some(index) = self.fields.get(field) else {
            return RoaringBitmap::new();
        };

        let mut range = index.dictionary.range();
        range = match lower {
            Bound::Included(bytes) => range.ge(bytes),
            Bound::Excluded(bytes) => range.gt(bytes),
            Bound::Unbounded => range,
        };
        range = match upper {
            Bound::Included(bytes) => range.le(bytes),
            Bound::Excluded(bytes) => range.lt(bytes),
            Bound::Unbounded => range,
        };
        index.union_stream(range.into_stream())
    }

    pub fn prefix(&self, field: &FieldName, prefix: &str) -> RoaringBitmap {
        let Some(index) = self.fields.get(field) else {
            return RoaringBitmap::new();
        };
        let automaton = Str::new(prefix).starts_with();
        index.union_stream(index.dictionary.search(automaton).into_stream())
    }

    /// `*` matches any run of characters, `?` exactly one.
    pub fn wildcard(&self, field: &FieldName, pattern: &str) -> Result<RoaringBitmap> {
        let Some(index) = self.fields.get(field) else {
            return Ok(RoaringBitmap::new());
        };

        let regex = wildcard_regex(pattern)?;
        let literal_prefix: String = pattern.chars().take_while(|c| *c != '*' && *c != '?').collect();

        // Only terms sharing the literal prefix can match
        let mut stream = index.dictionary.range().ge(literal_prefix.as_bytes()).into_stream();
        let mut docs = RoaringBitmap::new();
        let mut examined = 0usize;
        while let Some((bytes, ordinal)) = stream.next() {
            if !bytes.starts_with(literal_prefix.as_bytes()) {
                break;
            }
            examined += 1;
            let Ok(text) = std::str::from_utf8(bytes) else { continue };
            if regex.is_match(text) {
                if let Some(postings) = index.postings_for(ordinal) {
                    docs |= postings;
                }
            }
        }
        debug!(field = %field, pattern, examined, matched = docs.len(), "wildcard enumeration");
        Ok(docs)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }
}

fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("(?s)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');
    Ok(Regex::new(&expr)?)
}

/// Accumulates documents and freezes them into an `InvertedIndex`.
#[derive(Default)]
pub struct IndexBuilder {
    terms: BTreeMap<FieldName, BTreeMap<Vec<u8>, RoaringBitmap>>,
    next_doc: u32,
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder {
            terms: BTreeMap::new(),
            next_doc: 0,
        }
    }

    /// Ids are assigned densely in insertion order.
    pub fn add_document(&mut self, document: &IndexDocument) -> Result<DocId> {
        let doc_id = self.next_doc;
        self.next_doc = self.next_doc.checked_add(1).ok_or_else(|| {
            Error::new(ErrorKind::Internal, "document id space exhausted")
        })?;

        for (field, values) in document.fields() {
            let field_terms = self.terms.entry(field.clone()).or_default();
            for value in values {
                field_terms.entry(value.clone()).or_default().insert(doc_id);
            }
        }
        Ok(DocId(doc_id))
    }

    pub fn build(self) -> Result<InvertedIndex> {
        let mut fields = HashMap::with_capacity(self.terms.len());

        for (field, terms) in self.terms {
            // BTreeMap iteration is sorted, as the FST requires
            let mut builder = MapBuilder::memory();
            let mut postings = Vec::with_capacity(terms.len());
            let mut present = RoaringBitmap::new();
            for (ordinal, (bytes, docs)) in terms.into_iter().enumerate() {
                builder.insert(&bytes, ordinal as u64)?;
                present |= &docs;
                postings.push(docs);
            }
            let dictionary = builder.into_map();
            fields.insert(field, FieldIndex { dictionary, postings, present });
        }

        debug!(fields = fields.len(), docs = self.next_doc, "built inverted index");
        Ok(InvertedIndex {
            fields,
            doc_count: self.next_doc,
        })
    }
}
