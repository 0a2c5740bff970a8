//! Document structures for indexing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

/// Kind of indexed entity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    Content,
    Media,
}

/// Publication status of a content record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

/// A content record as supplied by the content service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContentRecord {
    /// Entity id within the content service
    #[validate(length(min = 1))]
    pub id: String,

    /// Owning tenant
    #[validate(length(min = 1))]
    pub tenant_id: String,

    /// Title
    #[validate(length(min = 1))]
    pub title: String,

    /// Body text
    #[serde(default)]
    pub body: String,

    /// Short excerpt
    pub excerpt: Option<String>,

    /// Tags (order preserved for display, irrelevant for matching)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Categories
    #[serde(default)]
    pub categories: Vec<String>,

    /// Publication status
    pub status: ContentStatus,

    /// Author user id
    pub author_id: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// A media record as supplied by the media service
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MediaRecord {
    /// Entity id within the media service
    #[validate(length(min = 1))]
    pub id: String,

    /// Owning tenant
    #[validate(length(min = 1))]
    pub tenant_id: String,

    /// Stored filename
    #[validate(length(min = 1))]
    pub filename: String,

    /// Original upload name
    pub original_name: Option<String>,

    /// Alt text
    pub alt_text: Option<String>,

    /// Caption
    pub caption: Option<String>,

    /// Description
    pub description: Option<String>,

    /// Media type (e.g. "image/png")
    pub media_type: String,

    /// Uploader user id
    pub uploader_id: Option<String>,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// The forward-index value: a unified view over content and media records.
///
/// `searchable_text` and `boost` are derived on every indexing call and never
/// accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Composite id, `{kind}:{entity_id}`, unique within the index
    pub id: String,

    /// Entity kind
    pub kind: DocumentKind,

    /// Owning tenant
    pub tenant_id: String,

    /// Title (content)
    pub title: Option<String>,

    /// Body text (content)
    pub body: Option<String>,

    /// Excerpt (content)
    pub excerpt: Option<String>,

    /// Filename (media)
    pub filename: Option<String>,

    /// Original upload name (media)
    pub original_name: Option<String>,

    /// Alt text (media)
    pub alt_text: Option<String>,

    /// Caption (media)
    pub caption: Option<String>,

    /// Description (media)
    pub description: Option<String>,

    /// Tags
    pub tags: Vec<String>,

    /// Categories
    pub categories: Vec<String>,

    /// Publication status (content)
    pub status: Option<ContentStatus>,

    /// Media type (media)
    pub media_type: Option<String>,

    /// Author or uploader user id
    pub owner_id: Option<String>,

    /// Created timestamp
    pub created_at: DateTime<Utc>,

    /// Updated timestamp
    pub updated_at: DateTime<Utc>,

    /// Concatenation of all textual fields, regenerated on every index call
    pub searchable_text: String,

    /// Relevance weight derived from kind, status, and recency
    pub boost: f64,
}

impl Document {
    /// Composite document id for an entity
    pub fn composite_id(kind: DocumentKind, entity_id: &str) -> String {
        format!("{}:{}", kind, entity_id)
    }

    pub fn entity_id(&self) -> &str {
        self.id
            .split_once(':')
            .map(|(_, entity)| entity)
            .unwrap_or(&self.id)
    }
}

impl From<&ContentRecord> for Document {
    fn from(record: &ContentRecord) -> Self {
        Self {
            id: Document::composite_id(DocumentKind::Content, &record.id),
            kind: DocumentKind::Content,
            tenant_id: record.tenant_id.clone(),
            title: Some(record.title.clone()),
            body: Some(record.body.clone()),
            excerpt: record.excerpt.clone(),
            filename: None,
            original_name: None,
            alt_text: None,
            caption: None,
            description: None,
            tags: record.tags.clone(),
            categories: record.categories.clone(),
            status: Some(record.status),
            media_type: None,
            owner_id: record.author_id.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            searchable_text: String::new(),
            boost: 1.0,
        }
    }
}

impl From<&MediaRecord> for Document {
    fn from(record: &MediaRecord) -> Self {
        Self {
            id: Document::composite_id(DocumentKind::Media, &record.id),
            kind: DocumentKind::Media,
            tenant_id: record.tenant_id.clone(),
            title: None,
            body: None,
            excerpt: None,
            filename: Some(record.filename.clone()),
            original_name: record.original_name.clone(),
            alt_text: record.alt_text.clone(),
            caption: record.caption.clone(),
            description: record.description.clone(),
            tags: record.tags.clone(),
            categories: Vec::new(),
            status: None,
            media_type: Some(record.media_type.clone()),
            owner_id: record.uploader_id.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            searchable_text: String::new(),
            boost: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn content_record() -> ContentRecord {
        ContentRecord {
            id: "article-1".to_string(),
            tenant_id: "acme".to_string(),
            title: "Quarterly Report".to_string(),
            body: "Revenue grew".to_string(),
            excerpt: None,
            tags: vec!["finance".to_string()],
            categories: vec![],
            status: ContentStatus::Published,
            author_id: Some("user-9".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_composite_id() {
        assert_eq!(
            Document::composite_id(DocumentKind::Content, "abc"),
            "content:abc"
        );
        assert_eq!(
            Document::composite_id(DocumentKind::Media, "img-1"),
            "media:img-1"
        );
    }

    #[test]
    fn test_content_to_document() {
        let doc = Document::from(&content_record());
        assert_eq!(doc.id, "content:article-1");
        assert_eq!(doc.entity_id(), "article-1");
        assert_eq!(doc.kind, DocumentKind::Content);
        assert_eq!(doc.status, Some(ContentStatus::Published));
        assert!(doc.filename.is_none());
    }

    #[test]
    fn test_record_validation() {
        let mut record = content_record();
        assert!(record.validate().is_ok());

        record.id = String::new();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(DocumentKind::Content.to_string(), "content");
        assert_eq!(ContentStatus::Published.to_string(), "published");
    }
}
