//! Query inspection tool for facet configurations
//!
//! Loads a YAML facet configuration, parses a query string the way a listing
//! page would receive it, and prints the SQL that would be executed.
//!
//! Usage:
//!   tablefacets --config facets.yaml query 'keys=tax&category[]=books' [--count] [--positional]
//!   tablefacets --config facets.yaml facet-counts category 'published=2012'
//!   tablefacets --config facets.yaml granularities
//!   tablefacets --config facets.yaml keywords 'keys=tax OR law'

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value as JsonValue};
use tablefacets_query::{FacetConfig, SearchRequest, SelectQuery};

#[derive(Parser, Debug)]
#[clap(name = "tablefacets")]
#[clap(about = "Build facet search queries from a table configuration")]
struct Args {
    /// Path to the YAML facet configuration
    #[clap(short, long, env = "TABLEFACETS_CONFIG")]
    config: PathBuf,

    /// Emit logs as JSON
    #[clap(long)]
    log_json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the result (or count) query for a query string
    Query {
        query_string: String,

        /// Build the row count query instead of a result page
        #[clap(long)]
        count: bool,

        /// Render `?` placeholders with positional values
        #[clap(long)]
        positional: bool,
    },
    /// Print the value count query for one facet column
    FacetCounts {
        column: String,
        #[clap(default_value = "")]
        query_string: String,
    },
    /// Print the supported granularities of every date column
    Granularities,
    /// Print the boolean full-text expression built from `keys`
    Keywords { query_string: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_json)?;

    let config = FacetConfig::from_path(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    tracing::info!(table = %config.table(), "Loaded facet configuration");

    let output = run(&config, args.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(config: &FacetConfig, command: Command) -> Result<JsonValue> {
    match command {
        Command::Query {
            query_string,
            count,
            positional,
        } => {
            let request = SearchRequest::from_query_string(config, &query_string);
            let query = if count {
                request.build_count()
            } else {
                request.build_results()
            }
            .context("failed to build query")?;
            Ok(query_json(&query, positional))
        }
        Command::FacetCounts {
            column,
            query_string,
        } => {
            let request = SearchRequest::from_query_string(config, &query_string);
            let query = request
                .build_facet_counts(&column)
                .with_context(|| format!("failed to build facet counts for '{column}'"))?;
            Ok(query_json(&query, false))
        }
        Command::Granularities => Ok(serde_json::to_value(config.granularities())?),
        Command::Keywords { query_string } => {
            let request = SearchRequest::from_query_string(config, &query_string);
            Ok(json!({
                "raw": request.params().keywords(),
                "expression": request.user_keywords(),
            }))
        }
    }
}

fn query_json(query: &SelectQuery, positional: bool) -> JsonValue {
    if positional {
        let (sql, values) = query.to_positional_sql();
        json!({ "sql": sql, "params": values })
    } else {
        let params: serde_json::Map<String, JsonValue> = query
            .bindings()
            .iter()
            .map(|(name, value)| (name.to_string(), JsonValue::from(value)))
            .collect();
        json!({ "sql": query.to_named_sql(), "params": params })
    }
}
