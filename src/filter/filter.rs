use std::collections::BTreeSet;
use std::fmt;
use crate::core::types::Term;
use crate::filter::liveness::LivenessFilter;
use crate::schema::field_names::FieldName;

/// Non-scoring document predicates understood by the searcher
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    MatchAll,                  // Every document physically present, deleted ones included
    Live(LivenessFilter),      // Documents not marked deleted
    Term(Term),
    Terms(TermsFilter),        // Any of a set of terms, possibly across fields
    TermRange(TermRange),      // Byte-lexical range
    NumericRange(NumericRange),
    Wildcard(WildcardFilter),  // Term enumeration at evaluation time
    Prefix(PrefixFilter),
    FieldPresent(FieldName),   // Field has at least one value
    Bool(BooleanFilter),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TermsFilter {
    pub terms: BTreeSet<Term>,
}

impl TermsFilter {
    pub fn new() -> Self {
        TermsFilter { terms: BTreeSet::new() }
    }

    pub fn insert(&mut self, term: Term) {
        self.terms.insert(term);
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<Term> for TermsFilter {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        TermsFilter {
            terms: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermRange {
    pub field: FieldName,
    pub lower: Option<Vec<u8>>,
    pub upper: Option<Vec<u8>>,
    pub include_lower: bool,
    pub include_upper: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Int,
    Long,
}

/// Int/long range; bounds outside the i32 domain are rejected for `Int` at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericRange {
    pub field: FieldName,
    pub kind: NumericKind,
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub include_lower: bool,
    pub include_upper: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardFilter {
    pub field: FieldName,
    pub pattern: String,  // `*` any run, `?` one character
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixFilter {
    pub field: FieldName,
    pub prefix: String,
}

/// must: all match (AND), should: at least one matches (OR), must_not: none match.
/// A filter with neither must nor should clauses matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BooleanFilter {
    pub must: Vec<Filter>,
    pub should: Vec<Filter>,
    pub must_not: Vec<Filter>,
}

impl BooleanFilter {
    pub fn new() -> Self {
        BooleanFilter {
            must: Vec::new(),
            should: Vec::new(),
            must_not: Vec::new(),
        }
    }

    pub fn with_must(mut self, filter: Filter) -> Self {
        self.must.push(filter);
        self
    }

    pub fn with_should(mut self, filter: Filter) -> Self {
        self.should.push(filter);
        self
    }

    pub fn with_must_not(mut self, filter: Filter) -> Self {
        self.must_not.push(filter);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    Should,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanQuery {
    pub clauses: Vec<(Occur, CompiledQuery)>,
}

/// Output of the compiler, executed by the searcher
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledQuery {
    Term(Term),
    ConstantScore { filter: Filter, boost: f32 },
    Boolean(BooleanQuery),
}

impl CompiledQuery {
    pub fn constant_score(filter: Filter) -> Self {
        CompiledQuery::ConstantScore { filter, boost: 1.0 }
    }

    /// The wrapped filter of a constant-score query.
    pub fn filter(&self) -> Option<&Filter> {
        match self {
            CompiledQuery::ConstantScore { filter, .. } => Some(filter),
            _ => None,
        }
    }
}

fn write_bytes(f: &mut fmt::Formatter, bytes: &[u8]) -> fmt::Result {
    match std::str::from_utf8(bytes) {
        Ok(text) => f.write_str(text),
        Err(_) => write!(f, "{:02x?}", bytes),
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter, prefix: &str, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {}{}", prefix, item)?;
    }
    Ok(())
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Filter::MatchAll => f.write_str("*:*"),
            Filter::Live(live) => write!(f, "live(v{}, -{})", live.version(), live.deleted().len()),
            Filter::Term(term) => write!(f, "{}", term),
            Filter::Terms(terms) => {
                f.write_str("terms(")?;
                for (i, term) in terms.terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", term)?;
                }
                f.write_str(")")
            }
            Filter::TermRange(range) => {
                write!(f, "{}:{}", range.field, if range.include_lower { '[' } else { '{' })?;
                match &range.lower {
                    Some(lower) => write_bytes(f, lower)?,
                    None => f.write_str("*")?,
                }
                f.write_str(" TO ")?;
                match &range.upper {
                    Some(upper) => write_bytes(f, upper)?,
                    None => f.write_str("*")?,
                }
                write!(f, "{}", if range.include_upper { ']' } else { '}' })
            }
            Filter::NumericRange(range) => {
                let bound = |b: Option<i64>| b.map(|v| v.to_string()).unwrap_or_else(|| "*".into());
                write!(
                    f,
                    "{}:{}{} TO {}{}",
                    range.field,
                    if range.include_lower { '[' } else { '{' },
                    bound(range.lower),
                    bound(range.upper),
                    if range.include_upper { ']' } else { '}' },
                )
            }
            Filter::Wildcard(w) => write!(f, "{}:{}", w.field, w.pattern),
            Filter::Prefix(p) => write!(f, "{}:{}*", p.field, p.prefix),
            Filter::FieldPresent(field) => write!(f, "{}:[* TO *]", field),
            Filter::Bool(b) => {
                f.write_str("(")?;
                write_list(f, "+", &b.must)?;
                write_list(f, "", &b.should)?;
                write_list(f, "-", &b.must_not)?;
                f.write_str(" )")
            }
        }
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompiledQuery::Term(term) => write!(f, "{}", term),
            CompiledQuery::ConstantScore { filter, boost } => write!(f, "ConstantScore({})^{}", filter, boost),
            CompiledQuery::Boolean(query) => {
                f.write_str("(")?;
                for (occur, clause) in &query.clauses {
                    match occur {
                        Occur::Must => write!(f, " +{}", clause)?,
                        Occur::Should => write!(f, " {}", clause)?,
                    }
                }
                f.write_str(" )")
            }
        }
    }
}
