use feed_rs::model::{FeedType, Text};
use feed_rs::parser;
use html_escape::decode_html_entities;
use tracing::debug;

use crate::app::error::ParseError;
use crate::domain::{Entry, ItemId, Source};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedMeta {
    pub address: String,
    pub title: String,
    pub summary: String,
}

impl FeedMeta {
    pub fn into_source(self) -> Source {
        Source::new(self.address, self.title, self.summary)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedFeed {
    pub meta: FeedMeta,
    pub entries: Vec<Entry>,
}

/// Turns a raw channel/item syndication document into feed metadata and entries.
#[derive(Clone, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, body: &[u8], source_address: &str) -> Result<ExtractedFeed, ParseError> {
        let feed = parser::parse(body).map_err(|e| ParseError::Malformed(e.to_string()))?;

        match feed.feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => {}
            other => return Err(ParseError::UnsupportedFormat(format!("{:?}", other))),
        }

        let title = feed
            .title
            .as_ref()
            .map(decode_text)
            .ok_or(ParseError::MissingChannelField("title"))?;
        let summary = feed
            .description
            .as_ref()
            .map(decode_text)
            .ok_or(ParseError::MissingChannelField("description"))?;

        let entries: Vec<Entry> = feed
            .entries
            .into_iter()
            .map(|entry| {
                // Entries without a link are keyed by their guid
                let permalink = entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .unwrap_or_else(|| entry.id.clone());

                Entry {
                    id: ItemId::generate(),
                    title: entry.title.as_ref().map(decode_text).unwrap_or_default(),
                    summary: entry.summary.as_ref().map(decode_text).unwrap_or_default(),
                    permalink,
                }
            })
            .collect();

        debug!("Extracted {} entries from {}", entries.len(), source_address);

        Ok(ExtractedFeed {
            meta: FeedMeta {
                address: source_address.to_string(),
                title,
                summary,
            },
            entries,
        })
    }
}

fn decode_text(text: &Text) -> String {
    decode_html_entities(text.content.trim()).to_string()
}
