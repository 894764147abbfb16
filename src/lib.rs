//! # Broadsheet
//!
//! A terminal news reader: fetch the headlines of a country's major outlets,
//! then browse them in an interactive pager or print them.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Store → NewsService → Pager / Output
//! ```
//!
//! - [`fetcher`]: HTTP client with ETag/conditional request support
//! - [`normalizer`]: Converts RSS/Atom feeds to unified items
//! - [`store`]: SQLite article cache
//! - [`tui`]: Interactive pager built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Latest Dutch news in the pager
//! broadsheet latest
//!
//! # Search British outlets, print as plain text
//! broadsheet search brexit --country uk --format plain
//!
//! # Today's digest
//! broadsheet digest --limit 10
//! ```

/// Application context, news service and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store and
/// fetchers; [`NewsService`](app::NewsService) runs the news operations.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/broadsheet/config.toml`, supporting:
/// - Custom colors (named, palette index or hex)
/// - Custom keybindings
/// - Pager, cache and fetch settings
pub mod config;

/// Command-line interface using clap.
///
/// - `latest` - Latest articles, optionally filtered
/// - `search <query>` - Keyword search
/// - `digest` - A balanced selection of today's news
/// - `sources` / `countries` - Source catalog
/// - `cache stats|clear` - Cache maintenance
pub mod cli;

/// Core domain models.
///
/// - [`Item`](domain::Item): One article with a SHA256 ID
/// - [`Source`](domain::Source) and [`Country`](domain::Country): The built-in catalog
pub mod domain;

/// HTTP fetching with conditional request support.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Tracing subscriber setup.
pub mod logging;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into unified [`Item`](domain::Item) structs.
pub mod normalizer;

/// JSON, plain text and markdown output.
pub mod output;

/// Markdown rendering for the terminal.
pub mod render;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// HTML cleanup and width-aware truncation.
pub mod text;

/// Interactive pager.
///
/// A list of headlines and a scrollable article reader. Keys: j/k or
/// arrows move, Enter opens, Esc goes back, PgUp/PgDn page, g/G jump,
/// o opens in the browser, h shows help, q quits. The mouse wheel scrolls
/// and a click opens an article.
pub mod tui;
