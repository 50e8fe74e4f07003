//! Terminal rendering of state changes.
//!
//! This is the single store listener. It only reads state and is the one
//! place where message codes become text.

pub mod catalog;

use std::io::{self, Write};

use tracing::warn;

use crate::domain::{AppState, FormStage, Item};
use crate::store::{Listener, Mutation, StatePath};

pub use catalog::{Catalog, Locale, MessageKey};

pub struct TerminalRenderer<W> {
    out: W,
    catalog: Catalog,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(catalog: Catalog) -> Self {
        Self::new(io::stdout(), catalog)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, catalog: Catalog) -> Self {
        Self { out, catalog }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders one change into a buffer and writes it to the output at once.
    fn render(&mut self, change: &Mutation, state: &AppState) -> io::Result<()> {
        let mut buf = Vec::new();
        self.compose(&mut buf, change, state)?;
        if buf.is_empty() {
            return Ok(());
        }
        self.out.write_all(&buf)?;
        self.out.flush()
    }

    fn compose(&self, buf: &mut Vec<u8>, change: &Mutation, state: &AppState) -> io::Result<()> {
        match change {
            Mutation::SetFormStage(FormStage::Added) => {
                writeln!(buf, "{}", self.catalog.message(MessageKey::Success))?;
            }
            Mutation::SetFormStage(FormStage::Failed) => {
                // Network and parsing problems take priority over input errors
                if let Some(code) = state.transport_error_code.or(state.form.error_code) {
                    writeln!(buf, "! {}", self.catalog.message(MessageKey::Error(code)))?;
                }
            }
            Mutation::PrependSource(source) => {
                writeln!(
                    buf,
                    "[{}] {}",
                    self.catalog.message(MessageKey::FeedsHeading),
                    source.display_title()
                )?;
                if !source.summary.is_empty() {
                    writeln!(buf, "    {}", source.summary)?;
                }
            }
            Mutation::PrependItems(items) => {
                writeln!(
                    buf,
                    "[{}] +{}",
                    self.catalog.message(MessageKey::ItemsHeading),
                    items.len()
                )?;
                for item in items {
                    self.compose_item(buf, item, state.is_seen(item.id))?;
                }
            }
            Mutation::SetActiveDetail(Some(_)) => {
                if let Some(item) = state.active_item() {
                    writeln!(buf, "== {}", self.item_title(item))?;
                    if !item.summary.is_empty() {
                        writeln!(buf, "{}", item.summary)?;
                    }
                    writeln!(buf, "{}", item.permalink)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn compose_item(&self, buf: &mut Vec<u8>, item: &Item, seen: bool) -> io::Result<()> {
        let marker = if seen { " " } else { "*" };
        writeln!(
            buf,
            "{} {} <{}> [{}]",
            marker,
            self.item_title(item),
            item.permalink,
            item.id
        )
    }

    fn item_title<'a>(&self, item: &'a Item) -> &'a str {
        item.title()
            .unwrap_or_else(|| self.catalog.message(MessageKey::Untitled))
    }
}

impl<W: Write + Send> Listener for TerminalRenderer<W> {
    fn on_change(&mut self, path: StatePath, change: &Mutation, state: &AppState) {
        if let Err(e) = self.render(change, state) {
            warn!("Failed to render change at {}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::error::ErrorCode;
    use crate::domain::{Entry, ItemId, Source, SourceId};

    fn rendered(changes: Vec<Mutation>, state: &AppState) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), Catalog::new(Locale::En));
        for change in &changes {
            renderer.on_change(change.path(), change, state);
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn item(link: &str) -> Item {
        Entry {
            id: ItemId::generate(),
            title: format!("Title {link}"),
            summary: "Body".into(),
            permalink: link.into(),
        }
        .into_item(SourceId::from_address("https://example.com/feed"))
    }

    #[test]
    fn test_success_message() {
        let out = rendered(
            vec![Mutation::SetFormStage(FormStage::Added)],
            &AppState::new(),
        );
        assert_eq!(out, "RSS loaded successfully\n");
    }

    #[test]
    fn test_transport_error_takes_priority() {
        let mut state = AppState::new();
        state.form.error_code = Some(ErrorCode::InvalidUrl);
        state.transport_error_code = Some(ErrorCode::NetworkError);
        let out = rendered(vec![Mutation::SetFormStage(FormStage::Failed)], &state);
        assert!(out.contains("Network error"));

        state.transport_error_code = None;
        let out = rendered(vec![Mutation::SetFormStage(FormStage::Failed)], &state);
        assert!(out.contains("valid URL"));
    }

    #[test]
    fn test_items_show_seen_marker() {
        let a = item("a");
        let b = item("b");
        let mut state = AppState::new();
        state.ui.seen_item_ids.insert(a.id);

        let out = rendered(vec![Mutation::PrependItems(vec![a, b])], &state);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[Posts] +2");
        assert!(lines[1].starts_with("  Title a <a>"));
        assert!(lines[2].starts_with("* Title b <b>"));
    }

    #[test]
    fn test_source_and_detail() {
        let source = Source::new(
            "https://example.com/feed".into(),
            "Example".into(),
            "About".into(),
        );
        let a = item("https://example.com/a");
        let mut state = AppState::new();
        state.ui.active_detail_item_id = Some(a.id);
        state.items.push(a.clone());

        let out = rendered(
            vec![
                Mutation::PrependSource(source),
                Mutation::SetActiveDetail(Some(a.id)),
            ],
            &state,
        );
        assert_eq!(
            out,
            "[Feeds] Example\n    About\n== Title https://example.com/a\nBody\nhttps://example.com/a\n"
        );
    }

    #[test]
    fn test_untitled_item_uses_catalog() {
        let mut a = item("a");
        a.title.clear();
        let state = AppState::new();

        let out = rendered(vec![Mutation::PrependItems(vec![a.clone()])], &state);
        assert!(out.lines().nth(1).unwrap().starts_with("* (Untitled) <a>"));

        let mut renderer = TerminalRenderer::new(Vec::new(), Catalog::new(Locale::Ru));
        let change = Mutation::PrependItems(vec![a]);
        renderer.on_change(change.path(), &change, &state);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("(Без названия)"));
    }

    /// Counts how many writes reach the underlying output.
    #[derive(Default)]
    struct CountingWriter {
        writes: usize,
        bytes: Vec<u8>,
    }

    impl Write for CountingWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_each_change_is_one_write() {
        let items: Vec<Item> = (0..5).map(|i| item(&format!("link-{i}"))).collect();
        let mut renderer = TerminalRenderer::new(CountingWriter::default(), Catalog::new(Locale::En));

        let change = Mutation::PrependItems(items);
        renderer.on_change(change.path(), &change, &AppState::new());
        let quiet = Mutation::SetFormValid(true);
        renderer.on_change(quiet.path(), &quiet, &AppState::new());

        let out = renderer.into_inner();
        assert_eq!(out.writes, 1);
        assert_eq!(String::from_utf8(out.bytes).unwrap().lines().count(), 6);
    }

    #[test]
    fn test_other_changes_render_nothing() {
        let out = rendered(
            vec![
                Mutation::SetFormStage(FormStage::Sending),
                Mutation::SetFormValid(false),
                Mutation::MarkSeen(ItemId::generate()),
            ],
            &AppState::new(),
        );
        assert!(out.is_empty());
    }
}
