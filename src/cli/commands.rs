use std::path::Path;

use chrono::{DateTime, Local, Utc};

use crate::app::{AppContext, FilterOptions, NewsService, Result};
use crate::cli::{CacheAction, DigestArgs, FetchArgs, LatestArgs, SearchArgs};
use crate::config::Config;
use crate::domain::Country;
use crate::output::{self, json, markdown, plain, OutputFormat};
use crate::store::{CacheStats, Store};

/// Everything a command needs besides its own arguments.
pub struct Session<'a> {
    pub ctx: &'a AppContext,
    pub config: &'a Config,
    pub format: OutputFormat,
}

impl Session<'_> {
    fn service(&self, fetch: &FetchArgs) -> NewsService<'_> {
        NewsService::new(self.ctx, fetch.country, fetch.full)
    }

    fn print_document(&self, document: &str) -> Result<()> {
        let renderer = output::stdout_renderer(self.config)?;
        output::print_markdown(&renderer, document)
    }
}

fn title(base: String, full: bool) -> String {
    if full {
        format!("{} - Full Articles", base)
    } else {
        base
    }
}

pub fn latest_title(fetch: &FetchArgs) -> String {
    title(format!("Latest News ({})", upper(fetch.country)), fetch.full)
}

pub fn search_title(query: &str, fetch: &FetchArgs) -> String {
    title(
        format!("Search Results for '{}' ({})", query, upper(fetch.country)),
        fetch.full,
    )
}

pub fn digest_title(fetch: &FetchArgs, today: DateTime<Local>) -> String {
    title(
        format!(
            "Daily News Digest ({}) - {}",
            upper(fetch.country),
            today.format("%A, %B %-d, %Y")
        ),
        fetch.full,
    )
}

fn upper(country: Country) -> String {
    country.code().to_uppercase()
}

pub async fn latest(session: &Session<'_>, args: &LatestArgs) -> Result<()> {
    tracing::info!(
        "Fetching latest news for {}{}",
        args.fetch.country,
        if args.fetch.full { " (full articles)" } else { "" }
    );
    let service = session.service(&args.fetch);

    let items = if args.source.is_some() || args.category.is_some() {
        let options = FilterOptions {
            source: args.source.clone(),
            category: args.category.clone(),
            since: None,
            limit: args.limit,
        };
        service.filter(&options).await?
    } else {
        service.latest(args.limit).await?
    };

    tracing::info!("Found {} articles", items.len());
    output::emit_items(
        &items,
        &latest_title(&args.fetch),
        session.format,
        args.fetch.no_pager,
        session.config,
    )
}

pub async fn search(session: &Session<'_>, args: &SearchArgs) -> Result<()> {
    let query = args.query_text();
    tracing::info!("Searching for '{}' in {} news", query, args.fetch.country);
    let service = session.service(&args.fetch);

    let mut items = service.search(&query, args.limit).await?;
    if let Some(source) = &args.source {
        items.retain(|i| i.source.eq_ignore_ascii_case(source));
    }

    tracing::info!("Found {} matching articles", items.len());
    output::emit_items(
        &items,
        &search_title(&query, &args.fetch),
        session.format,
        args.fetch.no_pager,
        session.config,
    )
}

pub async fn digest(session: &Session<'_>, args: &DigestArgs) -> Result<()> {
    tracing::info!("Preparing the daily {} digest", args.fetch.country);
    let service = session.service(&args.fetch);

    let items = service.digest(&args.categories, args.limit).await?;

    tracing::info!("Prepared digest with {} articles", items.len());
    output::emit_items(
        &items,
        &digest_title(&args.fetch, Local::now()),
        session.format,
        args.fetch.no_pager,
        session.config,
    )
}

pub fn sources(session: &Session<'_>, country: Country) -> Result<()> {
    let sources = country.sources();
    match session.format {
        OutputFormat::Json => println!("{}", json::sources(sources)?),
        OutputFormat::Plain => print!("{}", plain::sources(sources)),
        OutputFormat::Markdown => session.print_document(&markdown::sources(country, sources))?,
    }
    Ok(())
}

pub fn countries(session: &Session<'_>) -> Result<()> {
    match session.format {
        OutputFormat::Json => println!("{}", json::countries()?),
        OutputFormat::Plain => print!("{}", plain::countries()),
        OutputFormat::Markdown => session.print_document(&markdown::countries())?,
    }
    Ok(())
}

pub fn cache(session: &Session<'_>, action: CacheAction) -> Result<()> {
    let store = &*session.ctx.store;
    match action {
        CacheAction::Stats => {
            let stats = CacheStats::collect(
                store,
                session.ctx.cache.max_age(),
                Utc::now(),
                store.path().map(Path::to_path_buf),
            )?;
            match session.format {
                OutputFormat::Json => println!("{}", json::cache_stats(&stats)?),
                OutputFormat::Plain => print!("{}", plain::cache_stats(&stats)),
                OutputFormat::Markdown => session.print_document(&markdown::cache_stats(&stats))?,
            }
        }
        CacheAction::Clear => {
            store.clear()?;
            tracing::info!("Cache cleared");
            println!("✅ Cache cleared successfully");
        }
    }
    Ok(())
}
