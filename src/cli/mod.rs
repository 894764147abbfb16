pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Country;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "broadsheet")]
#[command(version)]
#[command(about = "Read the news in your terminal", long_about = None)]
pub struct Cli {
    /// Report progress while fetching
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    pub format: OutputFormat,

    /// Number of sources fetched in parallel (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that fetches articles.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Country code (nl, us, uk, de, fr)
    #[arg(long, default_value = "nl")]
    pub country: Country,

    /// Keep the full article text instead of summaries
    #[arg(long)]
    pub full: bool,

    /// Print instead of opening the interactive pager
    #[arg(long)]
    pub no_pager: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LatestArgs {
    /// Number of articles to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// Only articles from this source (e.g. "NOS", "NU.nl")
    #[arg(short, long)]
    pub source: Option<String>,

    /// Only articles tagged with this category
    #[arg(short, long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Words to search for
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// Only results from this source
    #[arg(short, long)]
    pub source: Option<String>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Debug, Clone)]
pub struct DigestArgs {
    /// Number of articles in the digest
    #[arg(short, long, default_value_t = 15)]
    pub limit: usize,

    /// Categories to include, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the latest articles
    Latest(LatestArgs),
    /// Search articles by keyword
    Search(SearchArgs),
    /// A balanced digest of today's news
    Digest(DigestArgs),
    /// List the news sources of a country
    Sources {
        /// Country code (nl, us, uk, de, fr)
        #[arg(long, default_value = "nl")]
        country: Country,
    },
    /// List supported countries
    Countries,
    /// Inspect or clear the article cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Show cache statistics
    Stats,
    /// Remove every cached article
    Clear,
}
