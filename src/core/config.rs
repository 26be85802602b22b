use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Compiler
    pub require_liveness: bool,        // Fail negations when no liveness filter is available
    pub allow_leading_wildcard: bool,  // Accept "*foo" style patterns

    // Validator
    pub max_bool_clauses: usize,       // Children per And/Or node
    pub max_query_depth: usize,        // Nesting of And/Or nodes

    // Searcher
    pub filter_cache_size: usize,      // Cached constant-score filters per searcher
    pub exclude_deleted_hits: bool,    // Post-filter deleted docs from every result
}

impl Default for Config {
    fn default() -> Self {
        Config {
            require_liveness: true,
            allow_leading_wildcard: true,

            max_bool_clauses: 1024,
            max_query_depth: 32,

            filter_cache_size: 256,
            exclude_deleted_hits: false,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "require_liveness": false, "max_query_depth": 4 }"#).unwrap();
        assert!(!config.require_liveness);
        assert_eq!(config.max_query_depth, 4);
        assert_eq!(config.max_bool_clauses, Config::default().max_bool_clauses);
        assert!(config.allow_leading_wildcard);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/definitely/not/here.json").unwrap_err();
        assert_eq!(err.kind, crate::core::error::ErrorKind::Io);
    }
}
