pub mod encodings;
pub mod models;
mod search;

pub use search::{GeneticSearch, SearchConfig, SearchError};
