// src/shared/types/mod.rs
pub mod doc;
pub mod search_options;

pub use doc::Doc;
pub use search_options::{SearchOptions, SearchParams};
