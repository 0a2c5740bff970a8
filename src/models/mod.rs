//! Domain records and the forward-index document model

mod document;

pub use document::{ContentRecord, ContentStatus, Document, DocumentKind, MediaRecord};
