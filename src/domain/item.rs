use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SourceId;

/// Opaque per-parse identifier used for rendering keys and seen-tracking.
///
/// Two fetches of the same entry produce different ids; equality of entries
/// is decided by permalink instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// An entry as extracted from a document, not yet owned by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: ItemId,
    pub title: String,
    pub summary: String,
    pub permalink: String,
}

impl Entry {
    pub fn into_item(self, source_id: SourceId) -> Item {
        Item {
            id: self.id,
            source_id,
            title: self.title,
            summary: self.summary,
            permalink: self.permalink,
            fetched_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub source_id: SourceId,
    pub title: String,
    pub summary: String,
    pub permalink: String,
    pub fetched_at: DateTime<Utc>,
}

impl Item {
    /// The item's title, if the document gave it one.
    pub fn title(&self) -> Option<&str> {
        Some(self.title.as_str()).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(link: &str) -> Entry {
        Entry {
            id: ItemId::generate(),
            title: "Title".into(),
            summary: "Summary".into(),
            permalink: link.into(),
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn test_id_parses_from_display() {
        let id = ItemId::generate();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_into_item_stamps_source() {
        let e = entry("https://example.com/a");
        let id = e.id;
        let source_id = SourceId::from_address("https://example.com/feed");
        let item = e.into_item(source_id.clone());
        assert_eq!(item.id, id);
        assert_eq!(item.source_id, source_id);
        assert_eq!(item.permalink, "https://example.com/a");
    }

    #[test]
    fn test_empty_title_is_none() {
        let mut e = entry("https://example.com/a");
        assert_eq!(e.clone().into_item(SourceId::from_address("x")).title(), Some("Title"));
        e.title.clear();
        let item = e.into_item(SourceId::from_address("x"));
        assert_eq!(item.title(), None);
    }
}
