use std::collections::BTreeSet;
use std::sync::Arc;
use proptest::prelude::*;
use resdex::acl::privilege::{PrincipalType, Privilege};
use resdex::core::config::Config;
use resdex::core::types::DocId;
use resdex::filter::filter::CompiledQuery;
use resdex::index::document::IndexDocument;
use resdex::index::inverted::IndexBuilder;
use resdex::index::snapshot::IndexSnapshots;
use resdex::query::ast::{FieldRef, PropertyExistsQuery, Query, TermOperator, TermSetQuery, UriSetQuery};
use resdex::query::compiler::QueryCompiler;
use resdex::schema::property::{PropertyType, PropertyTypeDefinition};
use resdex::search::searcher::Searcher;
use resdex::vocabulary::hierarchical::{TreeVocabulary, VocabularyRegistry};

const NAMES: [&str; 4] = ["alpha", "Alpha", "beta", "gamma"];
const TYPES: [&str; 4] = ["collection", "file", "html", "image"];

/// One generated resource.
///
/// Document 0 is the root; every other document hangs below one of the
/// documents before it (`parent % id`).
#[derive(Debug, Clone)]
struct Doc {
    name: usize,
    size: i32,
    resource_type: usize,
    parent: usize,
    titled: bool,
    has_acl: bool,
    deleted: bool,
}

/// Uri and ancestor ids of every document
struct Tree {
    uris: Vec<String>,
    ancestors: Vec<Vec<String>>,
}

impl Tree {
    fn new(docs: &[Doc]) -> Self {
        let mut uris: Vec<String> = Vec::with_capacity(docs.len());
        let mut ancestors: Vec<Vec<String>> = Vec::with_capacity(docs.len());
        for (i, doc) in docs.iter().enumerate() {
            if i == 0 {
                uris.push("/".to_string());
                ancestors.push(Vec::new());
                continue;
            }
            let parent = doc.parent % i;
            let uri = if parent == 0 {
                format!("/n{}", i)
            } else {
                format!("{}/n{}", uris[parent], i)
            };
            let mut chain = ancestors[parent].clone();
            chain.push(id(parent));
            uris.push(uri);
            ancestors.push(chain);
        }
        Tree { uris, ancestors }
    }
}

fn id(doc: usize) -> String {
    format!("d{}", doc)
}

#[derive(Debug, Clone)]
enum Predicate {
    Name(usize),
    NameIgnoreCase(usize),
    NamePattern(usize),
    NamePrefix(usize),
    SizeIn(Vec<i32>),
    Reader(usize),
    AnyReader,
    TypeBelow(usize),
    Subtree { doc: usize, self_excluded: bool },
    AnySubtree(Vec<usize>),
    UriIn(Vec<usize>),
    Titled,
}

impl Predicate {
    /// The predicate and its negation. Document references wrap around the corpus.
    fn queries(&self, docs: &[Doc]) -> (Query, Query) {
        let tree = Tree::new(docs);
        let pick = |seed: &usize| seed % docs.len();

        match self {
            Predicate::Name(i) => (
                Query::name(TermOperator::Eq, NAMES[*i]),
                Query::name(TermOperator::Ne, NAMES[*i]),
            ),
            Predicate::NameIgnoreCase(i) => (
                Query::name(TermOperator::EqIcase, NAMES[*i]),
                Query::name(TermOperator::NeIcase, NAMES[*i]),
            ),
            Predicate::NamePattern(i) => {
                let pattern = format!("{}*", &NAMES[*i][..2]);
                (
                    Query::wildcard(FieldRef::Name, TermOperator::Eq, &pattern),
                    Query::wildcard(FieldRef::Name, TermOperator::Ne, &pattern),
                )
            }
            Predicate::NamePrefix(i) => {
                let prefix = &NAMES[*i][..2];
                (
                    Query::prefix(FieldRef::Name, TermOperator::Eq, prefix),
                    Query::prefix(FieldRef::Name, TermOperator::Ne, prefix),
                )
            }
            Predicate::SizeIn(values) => {
                let set = |op| {
                    Query::TermSet(TermSetQuery {
                        field: "p_size".to_string(),
                        values: values.iter().map(|v| v.to_string()).collect(),
                        value_type: PropertyType::Int,
                        op,
                    })
                };
                (set(TermOperator::In), set(TermOperator::Ni))
            }
            Predicate::Reader(i) => {
                let reader = NAMES[*i].to_lowercase();
                (
                    Query::acl(Some(Privilege::Read), Some(&reader), false, true),
                    Query::acl(Some(Privilege::Read), Some(&reader), true, true),
                )
            }
            Predicate::AnyReader => (
                Query::acl(Some(Privilege::Read), None, false, true),
                Query::acl(Some(Privilege::Read), None, true, true),
            ),
            Predicate::TypeBelow(t) => (
                Query::hierarchical("resource-type", TermOperator::In, FieldRef::ResourceType, TYPES[*t]),
                Query::hierarchical("resource-type", TermOperator::Ni, FieldRef::ResourceType, TYPES[*t]),
            ),
            Predicate::Subtree { doc, self_excluded } => {
                let doc = pick(doc);
                let uri = &tree.uris[doc];
                let ids = [id(doc)];
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                (
                    Query::uri_prefix(uri, TermOperator::Eq, &ids, *self_excluded),
                    Query::uri_prefix(uri, TermOperator::Ne, &ids, *self_excluded),
                )
            }
            Predicate::AnySubtree(seeds) => {
                let ids: Vec<String> = seeds.iter().map(|s| id(pick(s))).collect();
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                (
                    Query::uri_prefix("/", TermOperator::In, &ids, false),
                    Query::uri_prefix("/", TermOperator::Ni, &ids, false),
                )
            }
            Predicate::UriIn(seeds) => {
                let uris: Vec<String> = seeds.iter().map(|s| tree.uris[pick(s)].clone()).collect();
                let set = |op| Query::UriSet(UriSetQuery { uris: uris.clone(), op });
                (set(TermOperator::In), set(TermOperator::Ni))
            }
            Predicate::Titled => {
                let field = FieldRef::property(title_def());
                (
                    Query::PropertyExists(PropertyExistsQuery { field: field.clone(), inverted: false }),
                    Query::PropertyExists(PropertyExistsQuery { field, inverted: true }),
                )
            }
        }
    }
}

fn title_def() -> PropertyTypeDefinition {
    PropertyTypeDefinition::new("title", PropertyType::String)
}

fn corpus() -> impl Strategy<Value = Vec<Doc>> {
    let doc = (
        0..NAMES.len(),
        -3i32..3,
        0..TYPES.len(),
        any::<usize>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, size, resource_type, parent, titled, has_acl, deleted)| Doc {
            name,
            size,
            resource_type,
            parent,
            titled,
            has_acl,
            deleted,
        });
    prop::collection::vec(doc, 1..24)
}

fn field_predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (0..NAMES.len()).prop_map(Predicate::Name),
        (0..NAMES.len()).prop_map(Predicate::NameIgnoreCase),
        (0..NAMES.len()).prop_map(Predicate::NamePattern),
        (0..NAMES.len()).prop_map(Predicate::NamePrefix),
        prop::collection::vec(-3i32..3, 1..4).prop_map(Predicate::SizeIn),
        Just(Predicate::Titled),
    ]
}

fn structure_predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![
        (0..NAMES.len()).prop_map(Predicate::Reader),
        Just(Predicate::AnyReader),
        (0..TYPES.len()).prop_map(Predicate::TypeBelow),
        (0..24usize, any::<bool>()).prop_map(|(doc, self_excluded)| Predicate::Subtree { doc, self_excluded }),
        prop::collection::vec(0..24usize, 1..4).prop_map(Predicate::AnySubtree),
        prop::collection::vec(0..24usize, 1..4).prop_map(Predicate::UriIn),
    ]
}

fn predicate() -> impl Strategy<Value = Predicate> {
    prop_oneof![field_predicate(), structure_predicate()]
}

fn vocabularies() -> Arc<VocabularyRegistry> {
    let types = TreeVocabulary::new()
        .with_child("resource".to_string(), "collection".to_string())
        .with_child("resource".to_string(), "file".to_string())
        .with_child("file".to_string(), "html".to_string())
        .with_child("file".to_string(), "image".to_string());
    Arc::new(VocabularyRegistry::new().register("resource-type", Arc::new(types)))
}

/// Index every document; nothing is deleted yet.
fn build(docs: &[Doc]) -> Arc<IndexSnapshots> {
    let tree = Tree::new(docs);
    let size = PropertyTypeDefinition::new("size", PropertyType::Int);
    let mut builder = IndexBuilder::new();
    for (i, doc) in docs.iter().enumerate() {
        let ancestors: Vec<&str> = tree.ancestors[i].iter().map(String::as_str).collect();
        let mut indexed = IndexDocument::new()
            .with_name(NAMES[doc.name])
            .with_uri(&tree.uris[i], &id(i), &ancestors)
            .with_resource_type(TYPES[doc.resource_type])
            .with_property(&size, &doc.size.to_string())
            .unwrap();
        if doc.titled {
            indexed = indexed.with_property(&title_def(), "Title").unwrap();
        }
        if doc.has_acl {
            indexed = indexed.with_acl(Privilege::ReadWrite, PrincipalType::User, &NAMES[doc.name].to_lowercase());
        }
        builder.add_document(&indexed).unwrap();
    }
    Arc::new(IndexSnapshots::new(builder.build().unwrap()))
}

fn delete_marked(snapshots: &IndexSnapshots, docs: &[Doc]) {
    let deleted = docs
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.deleted)
        .map(|(i, _)| DocId(i as u32));
    snapshots.delete_documents(deleted).unwrap();
}

fn compiler(snapshots: &Arc<IndexSnapshots>) -> QueryCompiler {
    QueryCompiler::new(Config::default(), snapshots.clone()).with_vocabularies(vocabularies())
}

fn search(snapshots: &IndexSnapshots, compiled: &CompiledQuery) -> BTreeSet<u32> {
    let searcher = Searcher::new(snapshots.current(), &Config::default());
    searcher.doc_ids(compiled).unwrap().into_iter().map(|d| d.0).collect()
}

fn live(docs: &[Doc]) -> BTreeSet<u32> {
    docs.iter()
        .enumerate()
        .filter(|(_, doc)| !doc.deleted)
        .map(|(i, _)| i as u32)
        .collect()
}

proptest! {
    #[test]
    fn negation_partitions_live_documents(docs in corpus(), predicate in predicate()) {
        let snapshots = build(&docs);
        delete_marked(&snapshots, &docs);
        let compiler = compiler(&snapshots);
        let (positive, negated) = predicate.queries(&docs);
        let positive = search(&snapshots, &compiler.compile(&positive).unwrap());
        let negated = search(&snapshots, &compiler.compile(&negated).unwrap());

        for doc in &live(&docs) {
            prop_assert!(
                positive.contains(doc) != negated.contains(doc),
                "live doc {} classified ambiguously", doc
            );
        }
    }

    #[test]
    fn deleted_documents_never_match_negations(docs in corpus(), predicate in predicate()) {
        let snapshots = build(&docs);
        delete_marked(&snapshots, &docs);
        let (_, negated) = predicate.queries(&docs);
        let negated = search(&snapshots, &compiler(&snapshots).compile(&negated).unwrap());

        for (i, doc) in docs.iter().enumerate() {
            if doc.deleted {
                prop_assert!(!negated.contains(&(i as u32)), "deleted doc {} matched", i);
            }
        }
    }

    #[test]
    fn deletes_after_compilation_are_honoured(docs in corpus(), predicate in predicate()) {
        let snapshots = build(&docs);
        let compiler = compiler(&snapshots);
        let (positive, negated) = predicate.queries(&docs);
        let positive = compiler.compile(&positive).unwrap();
        let negated = compiler.compile(&negated).unwrap();

        delete_marked(&snapshots, &docs);
        let positive = search(&snapshots, &positive);
        let negated = search(&snapshots, &negated);

        let live = live(&docs);
        for doc in 0..docs.len() as u32 {
            if live.contains(&doc) {
                prop_assert!(positive.contains(&doc) != negated.contains(&doc), "live doc {} classified ambiguously", doc);
            } else {
                prop_assert!(!negated.contains(&doc), "deleted doc {} matched", doc);
            }
        }
    }
}
