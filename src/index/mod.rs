//! In-memory index structures: tokenizer, inverted and forward indexes,
//! document indexer, and the fuzzy matcher

mod forward;
mod fuzzy;
mod indexer;
mod inverted;
mod tokenizer;

pub use forward::ForwardIndex;
pub use fuzzy::{levenshtein, within_distance};
pub use indexer::{calculate_boost, finalize_document, searchable_text, IndexInner};
pub use inverted::InvertedIndex;
pub use tokenizer::tokenize;
