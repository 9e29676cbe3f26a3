use anyhow::Result;
use clap::Args;
use portal_api::url_params;
use portal_api::Params;
use serde_json::{Map, Value};

use crate::output::print_json;

#[derive(Args)]
pub struct ExtractArgs {
    /// A search-page URL copied from the portal
    pub url: String,
}

pub fn run(args: &ExtractArgs) -> Result<()> {
    let params = url_params::extract(&args.url)?;
    print_json(&params_to_json(params));
    Ok(())
}

fn params_to_json(params: Params) -> Value {
    let map: Map<String, Value> = params
        .into_iter()
        .map(|(key, value)| (key, value.into_json()))
        .collect();
    Value::Object(map)
}
