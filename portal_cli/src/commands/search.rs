use anyhow::{bail, Result};
use clap::Args;
use portal_api::types::Record;
use portal_api::{resources, Api, Query, SearchQuery};

use crate::output::{
    print_assets_csv, print_assets_markdown, print_assets_table, print_json, print_records_csv,
    print_records_markdown, print_records_table, OutputFormat,
};

#[derive(Args)]
pub struct SearchArgs {
    /// Portal search-page URL to take the resource, query, filters, sort and fields from
    #[arg(long, conflicts_with_all = ["resource", "query", "filters", "sort", "fields"])]
    pub url: Option<String>,

    /// Resource name (specimens, indexlots) or resource UUID
    #[arg(long, default_value = "specimens")]
    pub resource: String,

    /// Free text search
    #[arg(long)]
    pub query: Option<String>,

    /// Filter on a record attribute as key:value (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Sort clauses, comma-separated (e.g. "genus desc,family")
    #[arg(long, value_delimiter = ',')]
    pub sort: Vec<String>,

    /// Fields to return, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Skip this many records
    #[arg(long, default_value = "0")]
    pub offset: u64,

    /// Records per request
    #[arg(long, default_value = "100")]
    pub limit: u64,

    /// Maximum number of results to print
    #[arg(long, default_value = "20")]
    pub max: usize,

    /// Print every result, ignoring --max
    #[arg(long)]
    pub all: bool,
}

/// Builds the search described by the arguments, either from `--url` or from
/// the individual flags.
pub fn build_query(args: &SearchArgs) -> Result<SearchQuery> {
    let query = match &args.url {
        Some(url) => Api::from_url(url)?,
        None => {
            let resource_id = resources::lookup(&args.resource).unwrap_or(args.resource.as_str());
            let mut query = SearchQuery::new(resource_id)
                .with_sorts(&args.sort)
                .with_fields(&args.fields);
            if let Some(text) = &args.query {
                query = query.with_query(text);
            }
            for filter in &args.filters {
                let Some((key, value)) = filter.split_once(':') else {
                    bail!("filter \"{}\" must look like key:value", filter);
                };
                query = query.with_filter(key, value);
            }
            query
        }
    };
    Ok(query.with_offset(args.offset).with_limit(args.limit))
}

pub fn records(args: &SearchArgs, api: &Api, format: &OutputFormat) -> Result<()> {
    let query = build_query(args)?;
    let mut results = api.records(&query)?;
    let records: Vec<Record> = if args.all {
        results.all().collect()
    } else {
        results.by_ref().flatten().take(args.max).collect()
    };

    eprintln!("{} records", records.len());
    print_records(&records, format)
}

pub fn assets(args: &SearchArgs, api: &Api, format: &OutputFormat) -> Result<()> {
    let query = build_query(args)?;
    let mut assets = api.assets(&query)?;
    let assets: Vec<_> = if args.all {
        assets.all().collect()
    } else {
        assets.by_ref().flatten().take(args.max).collect()
    };

    eprintln!("{} assets", assets.len());
    match format {
        OutputFormat::Table => print_assets_table(&assets),
        OutputFormat::Json => print_json(&assets),
        OutputFormat::Csv => print_assets_csv(&assets)?,
        OutputFormat::Markdown => print_assets_markdown(&assets),
    }
    Ok(())
}

pub fn count(args: &SearchArgs, api: &Api) -> Result<()> {
    let query = build_query(args)?;
    let results = api.records(&query)?;
    println!("{}", results.count());
    Ok(())
}

pub fn first(args: &SearchArgs, api: &Api, format: &OutputFormat) -> Result<()> {
    let query = build_query(args)?;
    let mut results = api.records(&query)?;
    let record = results.first()?;
    print_records(&[record], format)
}

fn print_records(records: &[Record], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_records_table(records),
        OutputFormat::Json => print_json(&records),
        OutputFormat::Csv => print_records_csv(records)?,
        OutputFormat::Markdown => print_records_markdown(records),
    }
    Ok(())
}
