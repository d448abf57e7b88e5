use anyhow::Context;
use bgg_catalog::{CatalogClient, CatalogService, get_api_base_url};
use bgg_search::SearchConfig;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use std::path::PathBuf;
use std::rc::Rc;
use tokio::task::LocalSet;

mod query;
mod terminal;
mod watch;

#[derive(Parser)]
#[command(name = "bgg")]
#[command(about = "Search the BoardGameGeek catalog as you type", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Search settings file (default: ~/.bgg/config.toml, if present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Catalog API base URL (default: $BGG_API_URL, else the public endpoint)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Bearer token forwarded to the catalog (default: $BGG_API_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single search and print the results
    #[command(alias = "q")]
    Query(query::QueryArgs),

    /// Search as lines arrive on stdin, one line per edit of the search field
    #[command(alias = "w")]
    Watch(watch::WatchArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug, RUST_LOG still wins
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let config = SearchConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load search configuration")?;

    let api_url = cli.api_url.unwrap_or_else(get_api_base_url);
    let token = cli.token.or_else(|| std::env::var("BGG_API_TOKEN").ok());
    log::debug!("Using catalog at {api_url}");
    let catalog: Rc<dyn CatalogService> = Rc::new(
        CatalogClient::new(api_url, token).context("Failed to create catalog client")?,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let command = cli.command;
    LocalSet::new().block_on(&runtime, async move {
        match command {
            Commands::Query(args) => query::execute(args, catalog, config).await,
            Commands::Watch(args) => watch::execute(args, catalog, config).await,
        }
    })
}
