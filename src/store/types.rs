use serde::{Deserialize, Serialize};

/// Page metadata attached to a bookmark.
///
/// Every field is optional: offline bookmarks only carry `url`, and
/// fetched pages rarely declare every Open Graph property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Meta {
    /// Metadata for a bookmark stored without fetching the page.
    pub fn offline(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Present fields as `(key, value)` pairs, in on-disk key names.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("title", &self.title),
            ("url", &self.url),
            ("type", &self.kind),
            ("image", &self.image),
            ("description", &self.description),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// A full bookmark document, stored as `{id}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub filename: String,
    pub meta: Meta,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch. Records are never mutated, so this
    /// always equals `created_at`.
    pub updated_at: i64,
}

/// Summary of a bookmark as kept in `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

impl IndexItem {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            filename: record.filename.clone(),
            title: record.meta.title.clone().unwrap_or_default(),
            url: record.meta.url.clone().unwrap_or_default(),
        }
    }
}

/// The manifest of every bookmark plus the next id to hand out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub count: u64,
    pub items: Vec<IndexItem>,
}

impl Index {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// File name of the record with the given id.
pub fn record_filename(id: u64) -> String {
    format!("{id}.json")
}
