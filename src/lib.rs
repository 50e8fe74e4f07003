//! # feedwatch
//!
//! Watches RSS feeds and keeps a duplicate-free list of their posts.
//!
//! ## Architecture
//!
//! ```text
//! Validator → Pipeline (Fetcher → Extractor) → Store → Renderer
//!                 ↑                              │
//!                 └──────── Scheduler ←──────────┘
//! ```
//!
//! Every state change goes through the [`store`], which notifies a single
//! listener (the terminal [`render`]er). Once the first feed has been added
//! the [`scheduler`] re-acquires every feed on a fixed interval and merges
//! only the posts whose permalink is not yet known for that feed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Watch a feed, then type more addresses on stdin
//! feedwatch watch https://blog.rust-lang.org/feed.xml
//!
//! # Fetch a feed once
//! feedwatch check https://blog.rust-lang.org/feed.xml --json
//! ```

/// Application context, error types, and the submit/open flows.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the acquisition pipeline, and the polling scheduler.
pub mod app;

/// Command-line interface using clap.
///
/// - `watch [URL...]` - Add feeds and poll them, reading more from stdin
/// - `check <URL>` - Fetch a feed once
pub mod cli;

/// Configuration loaded from `~/.config/feedwatch/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Source`](domain::Source): a registered feed
/// - [`Item`](domain::Item): a post owned by a source
/// - [`AppState`](domain::AppState): the whole observable state
pub mod domain;

/// Parsing of channel/item syndication documents.
pub mod extractor;

/// Transport indirection.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for obtaining raw documents
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Acquisition of one source and permalink-based deduplication.
pub mod pipeline;

/// Message catalog and the terminal store listener.
pub mod render;

/// Fixed-interval polling of all sources.
pub mod scheduler;

/// Observable application state.
pub mod store;

/// Address validation.
pub mod validator;
