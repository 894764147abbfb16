use clap::Parser;

use broadsheet::app::AppContext;
use broadsheet::cli::commands::{self, Session};
use broadsheet::cli::{Cli, Commands};
use broadsheet::config::Config;
use broadsheet::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines reach the file.
    let _log_guard = logging::init(cli.log_file.as_deref(), cli.verbose)?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("{}; using default configuration", e);
        Config::default()
    });
    for binding in config.keybindings.invalid_bindings() {
        tracing::warn!("Ignoring unknown key binding '{}'", binding);
    }

    let ctx = AppContext::from_config(&config, cli.workers)?;
    let session = Session {
        ctx: &ctx,
        config: &config,
        format: cli.format,
    };

    match cli.command {
        Commands::Latest(args) => commands::latest(&session, &args).await?,
        Commands::Search(args) => commands::search(&session, &args).await?,
        Commands::Digest(args) => commands::digest(&session, &args).await?,
        Commands::Sources { country } => commands::sources(&session, country)?,
        Commands::Countries => commands::countries(&session)?,
        Commands::Cache { action } => commands::cache(&session, action)?,
    }

    Ok(())
}
