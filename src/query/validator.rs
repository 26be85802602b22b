use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::ast::Query;

/// Query validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_bool_clauses: usize,
    pub max_query_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig::from(&Config::default())
    }
}

impl From<&Config> for ValidationConfig {
    fn from(config: &Config) -> Self {
        ValidationConfig {
            max_bool_clauses: config.max_bool_clauses,
            max_query_depth: config.max_query_depth,
        }
    }
}

/// Structural checks run before any builder is invoked
pub struct QueryValidator {
    config: ValidationConfig,
}

impl QueryValidator {
    pub fn new(config: ValidationConfig) -> Self {
        QueryValidator { config }
    }

    /// Validate query structure and constraints
    pub fn validate(&self, query: &Query) -> Result<()> {
        self.validate_node(query, 0)
    }

    fn validate_node(&self, query: &Query, depth: usize) -> Result<()> {
        if depth > self.config.max_query_depth {
            return Err(Error::new(
                ErrorKind::QueryTooComplex,
                format!("Query depth {} exceeds maximum {}",
                        depth, self.config.max_query_depth)
            ));
        }

        match query {
            Query::And(clauses) | Query::Or(clauses) => {
                if clauses.is_empty() {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!("Boolean '{}' query has no clauses", query.kind())
                    ));
                }
                if clauses.len() > self.config.max_bool_clauses {
                    return Err(Error::new(
                        ErrorKind::QueryTooComplex,
                        format!("Boolean query has {} clauses, max is {}",
                                clauses.len(), self.config.max_bool_clauses)
                    ));
                }
                for clause in clauses {
                    self.validate_node(clause, depth + 1)?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}
