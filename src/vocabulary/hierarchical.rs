use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Term taxonomy materialized ahead of query time.
pub trait HierarchicalVocabulary<T>: Send + Sync {
    /// Every value below `value`, excluding `value` itself.
    fn descendants(&self, value: &T) -> Vec<T>;
}

/// Vocabulary built from parent -> children edges.
///
/// Shared structure (DAGs) is reported once and cycles terminate; the
/// queried value never appears in its own descendants.
#[derive(Debug, Clone, Default)]
pub struct TreeVocabulary<T: Ord + Clone> {
    children: BTreeMap<T, Vec<T>>,
}

impl<T: Ord + Clone> TreeVocabulary<T> {
    pub fn new() -> Self {
        TreeVocabulary {
            children: BTreeMap::new(),
        }
    }

    pub fn add_child(&mut self, parent: T, child: T) {
        self.children.entry(parent).or_default().push(child);
    }

    pub fn with_child(mut self, parent: T, child: T) -> Self {
        self.add_child(parent, child);
        self
    }
}

impl<T: Ord + Clone + Send + Sync> HierarchicalVocabulary<T> for TreeVocabulary<T> {
    fn descendants(&self, value: &T) -> Vec<T> {
        let mut seen: BTreeSet<T> = BTreeSet::new();
        let mut result = Vec::new();
        let mut pending: Vec<&T> = vec![value];

        while let Some(current) = pending.pop() {
            if let Some(children) = self.children.get(current) {
                for child in children {
                    if child != value && seen.insert(child.clone()) {
                        result.push(child.clone());
                        pending.push(child);
                    }
                }
            }
        }

        result
    }
}

/// Named vocabularies handed to the compiler; read-only once built.
#[derive(Clone, Default)]
pub struct VocabularyRegistry {
    vocabularies: HashMap<String, Arc<dyn HierarchicalVocabulary<String>>>,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        VocabularyRegistry {
            vocabularies: HashMap::new(),
        }
    }

    pub fn register(
        mut self,
        name: &str,
        vocabulary: Arc<dyn HierarchicalVocabulary<String>>,
    ) -> Self {
        self.vocabularies.insert(name.to_string(), vocabulary);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn HierarchicalVocabulary<String>>> {
        self.vocabularies.get(name)
    }

    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> TreeVocabulary<String> {
        TreeVocabulary::new()
            .with_child("resource".into(), "file".into())
            .with_child("resource".into(), "collection".into())
            .with_child("file".into(), "image".into())
            .with_child("file".into(), "document".into())
            .with_child("document".into(), "pdf".into())
    }

    #[test]
    fn descendants_are_transitive() {
        let mut found = types().descendants(&"file".to_string());
        found.sort();
        assert_eq!(found, vec!["document", "image", "pdf"]);
    }

    #[test]
    fn leaf_has_no_descendants() {
        assert!(types().descendants(&"pdf".to_string()).is_empty());
        assert!(types().descendants(&"unknown".to_string()).is_empty());
    }

    #[test]
    fn shared_nodes_and_cycles_terminate() {
        let vocab = TreeVocabulary::new()
            .with_child(1, 2)
            .with_child(1, 3)
            .with_child(2, 4)
            .with_child(3, 4)
            .with_child(4, 1);
        let mut found = vocab.descendants(&1);
        found.sort();
        assert_eq!(found, vec![2, 3, 4]);
    }

    #[test]
    fn registry_lookup() {
        let registry = VocabularyRegistry::new().register("types", Arc::new(types()));
        assert!(registry.get("types").is_some());
        assert!(registry.get("tags").is_none());
        assert_eq!(registry.len(), 1);
    }
}
