use anyhow::Result;
use portal_api::asset_url;
use portal_api::types::{media_id, AssetTuple, Record};
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Longest cell printed in table and markdown output.
const MAX_CELL_CHARS: usize = 60;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct AssetRow {
    #[tabled(rename = "Record")]
    #[serde(rename = "Record")]
    record_id: String,
    #[tabled(rename = "Asset")]
    #[serde(rename = "Asset")]
    asset_id: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Preview")]
    #[serde(rename = "Preview")]
    preview_url: String,
}

// -- Row builders --

/// Column names across all records, in the order they are first seen.
fn record_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn build_record_rows(
    records: &[Record],
    columns: &[String],
    max_chars: Option<usize>,
) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| {
                    let text = record.get(column).map(cell_text).unwrap_or_default();
                    match max_chars {
                        Some(max) => truncate_cell(text, max),
                        None => text,
                    }
                })
                .collect()
        })
        .collect()
}

/// One row per media entry; a record with several images spans several rows.
fn build_asset_rows(assets: &[AssetTuple]) -> Vec<AssetRow> {
    assets
        .iter()
        .flat_map(|a| {
            a.media_items().into_iter().map(|entry| {
                let asset_id = media_id(entry);
                AssetRow {
                    record_id: a.record_id.clone(),
                    title: entry.get("title").map(cell_text).unwrap_or_default(),
                    preview_url: asset_id.as_deref().map(asset_url).unwrap_or_default(),
                    asset_id: asset_id.unwrap_or_default(),
                }
            })
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_cell(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        return text;
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn records_table(records: &[Record]) -> Table {
    let columns = record_columns(records);
    let mut builder = Builder::default();
    builder.push_record(columns.clone());
    for row in build_record_rows(records, &columns, Some(MAX_CELL_CHARS)) {
        builder.push_record(row);
    }
    builder.build()
}

// -- Table output --

pub fn print_records_table(records: &[Record]) {
    println!("{}", records_table(records));
}

pub fn print_assets_table(assets: &[AssetTuple]) {
    println!("{}", Table::new(build_asset_rows(assets)));
}

// -- Markdown output --

pub fn print_records_markdown(records: &[Record]) {
    let mut table = records_table(records);
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_assets_markdown(assets: &[AssetTuple]) {
    let mut table = Table::new(build_asset_rows(assets));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

fn write_records_csv<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[Record],
) -> Result<()> {
    let columns = record_columns(records);
    wtr.write_record(&columns)?;
    for row in build_record_rows(records, &columns, None) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_records_csv(records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    write_records_csv(&mut wtr, records)
}

pub fn print_assets_csv(assets: &[AssetTuple]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_asset_rows(assets) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
