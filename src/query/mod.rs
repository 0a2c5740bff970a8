//! Query types and the search execution pipeline

mod engine;
mod highlight;
mod options;

pub(crate) use engine::execute;

pub use engine::{Pagination, SearchHit, SearchResponse};
pub use options::{SearchFilter, SearchOptions, SearchScope, SearchSort, SortField, SortOrder};
