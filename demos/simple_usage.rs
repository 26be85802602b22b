/// Resdex walkthrough
///
/// Builds a small repository index, deletes a document and runs a few
/// compiled queries against the current snapshot:
/// - name negation (deleted documents stay out)
/// - subtree, ACL and hierarchical predicates
/// - a query handed over as JSON

use resdex::acl::privilege::{PrincipalType, Privilege};
use resdex::core::config::Config;
use resdex::core::types::DocId;
use resdex::index::document::IndexDocument;
use resdex::index::inverted::IndexBuilder;
use resdex::index::snapshot::IndexSnapshots;
use resdex::query::ast::{FieldRef, Query, TermOperator};
use resdex::query::compiler::QueryCompiler;
use resdex::schema::property::{PropertyType, PropertyTypeDefinition};
use resdex::search::searcher::Searcher;
use resdex::vocabulary::hierarchical::{TreeVocabulary, VocabularyRegistry};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        Resdex - Query Compilation Demo        ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Index documents
    println!("Step 1: Indexing documents...");
    let size = PropertyTypeDefinition::new("size", PropertyType::Long);
    let docs = [
        IndexDocument::new().with_name("site").with_uri("/site", "1", &[]).with_resource_type("collection"),
        IndexDocument::new()
            .with_name("index.html")
            .with_uri("/site/index.html", "2", &["1"])
            .with_resource_type("html")
            .with_property(&size, "1200")?
            .with_acl(Privilege::Read, PrincipalType::Group, "everyone"),
        IndexDocument::new()
            .with_name("logo.png")
            .with_uri("/site/logo.png", "3", &["1"])
            .with_resource_type("image")
            .with_property(&size, "48000")?
            .with_acl(Privilege::ReadWrite, PrincipalType::User, "editor"),
        IndexDocument::new()
            .with_name("old.html")
            .with_uri("/site/old.html", "4", &["1"])
            .with_resource_type("html"),
    ];
    let mut builder = IndexBuilder::new();
    for doc in &docs {
        builder.add_document(doc)?;
    }
    let snapshots = Arc::new(IndexSnapshots::new(builder.build()?));
    println!("  Indexed {} documents\n", docs.len());

    // Step 2: Soft delete
    println!("Step 2: Deleting /site/old.html...");
    let snapshot = snapshots.delete_document(DocId(3))?;
    println!("  Snapshot v{}: {} live of {}\n", snapshot.version, snapshot.live_count(), snapshot.doc_count());

    // Step 3: Compile and search
    let types = TreeVocabulary::new()
        .with_child("file".to_string(), "html".to_string())
        .with_child("file".to_string(), "image".to_string());
    let vocabularies = Arc::new(VocabularyRegistry::new().register("resource-type", Arc::new(types)));
    let compiler = QueryCompiler::new(Config::default(), snapshots.clone()).with_vocabularies(vocabularies);

    println!("Step 3: Querying...");
    let queries = [
        ("name != index.html", Query::name(TermOperator::Ne, "index.html")),
        ("below /site", Query::uri_prefix("/site", TermOperator::Eq, &["1"], true)),
        ("readable by editor", Query::acl(Some(Privilege::Read), Some("editor"), false, true)),
        ("any file", Query::hierarchical("resource-type", TermOperator::In, FieldRef::ResourceType, "file")),
        ("size > 2000", Query::term(FieldRef::property(size.clone()), TermOperator::Gt, "2000")),
    ];
    for (label, query) in &queries {
        let compiled = compiler.compile(query)?;
        let searcher = Searcher::new(snapshots.current(), compiler.config());
        let results = searcher.search(&compiled, 10)?;
        println!("  {:<20} {:?}", label, results.doc_ids());
        println!("  {:<20} {}", "", compiled);
    }

    // Step 4: JSON algebra
    println!("\nStep 4: Query from JSON...");
    let json = r#"{ "wildcard": { "field": "name", "pattern": "*.HTML", "op": "EQ_ICASE" } }"#;
    let query: Query = serde_json::from_str(json)?;
    let compiled = compiler.compile(&query)?;
    let results = Searcher::new(snapshots.current(), compiler.config()).search(&compiled, 10)?;
    println!("  {} -> {:?}", json, results.doc_ids());

    // Step 5: Invalid query
    println!("\nStep 5: Invalid query...");
    match compiler.compile(&Query::wildcard(FieldRef::Name, TermOperator::Eq, "index")) {
        Ok(_) => println!("  unexpectedly compiled"),
        Err(e) => println!("  rejected ({}): {}", if e.is_invalid_query() { "invalid query" } else { "system" }, e),
    }

    println!("\nDone!");
    Ok(())
}
