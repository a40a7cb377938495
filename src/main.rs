//! Brick Builder Catalogue driver
//!
//! Runs one analysis against the remote catalogue and prints the result as
//! JSON.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use brick_catalogue::utils::telemetry::{init_tracing, DEFAULT_DIRECTIVE};
use brick_catalogue::{Analyzer, CatalogueClient, CatalogueConfig, CatalogueSource};

const USAGE: &str = "\
usage: brick_catalogue <command>

commands:
  builds <username>                which sets can this collector build
  gap <set> <username>             pieces missing for one set
  collaborate <set> <username>     collectors who could complete the set together
  users                            list collectors
  sets                             list sets

<set> may be a set id or a set name.";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(DEFAULT_DIRECTIVE).ok();

    let config = CatalogueConfig::from_env().context("Invalid configuration")?;
    info!("Using catalogue at {}", config.api_base);

    let client = Arc::new(CatalogueClient::new(&config)?);
    let analyzer = Analyzer::new(client.clone()).with_config(config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["builds", username] => print_json(&analyzer.analyze_buildability(username).await?),
        ["gap", set, username] => {
            let set_id = analyzer.resolve_set_id(set).await?;
            print_json(&analyzer.analyze_set_gap(&set_id, username).await?)
        }
        ["collaborate", set, username] => {
            let set_id = analyzer.resolve_set_id(set).await?;
            print_json(&analyzer.find_collaboration_plans(username, &set_id, None).await?)
        }
        ["users"] => print_json(&client.fetch_collector_roster().await?),
        ["sets"] => print_json(&client.fetch_set_catalog().await?),
        _ => {
            eprintln!("{USAGE}");
            bail!("unrecognised arguments: {}", args.join(" "));
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
