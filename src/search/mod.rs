pub mod results;
pub mod cache;
pub mod searcher;
