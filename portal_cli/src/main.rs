mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portal_api::{Api, Config};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Search records and media on the NHM data portal")]
struct Cli {
    /// Output format: table, json, csv, or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// API key sent as the Authorization header (overrides PORTAL_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// API base URL (overrides PORTAL_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log requests and paging decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search records in a resource
    Records(commands::search::SearchArgs),
    /// List media attached to records in a resource
    Assets(commands::search::SearchArgs),
    /// Count the records matching a search
    Count(commands::search::SearchArgs),
    /// Show the first record matching a search
    First(commands::search::SearchArgs),
    /// Print the search parameters encoded in a portal URL
    Extract(commands::extract::ExtractArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = if cli.verbose { "portal=debug" } else { "portal=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    let mut config = Config::from_env();
    if let Some(key) = &cli.api_key {
        config = config.with_api_key(key);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }

    // extract works offline, so the HTTP client is only built for searches
    let api = || Api::from_config(&config);
    match &cli.command {
        Commands::Records(args) => commands::search::records(args, &api()?, &format)?,
        Commands::Assets(args) => commands::search::assets(args, &api()?, &format)?,
        Commands::Count(args) => commands::search::count(args, &api()?)?,
        Commands::First(args) => commands::search::first(args, &api()?, &format)?,
        Commands::Extract(args) => commands::extract::run(args)?,
    }

    Ok(())
}
