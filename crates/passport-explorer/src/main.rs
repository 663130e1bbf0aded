//! Passport Explorer CLI
//!
//! Ranks passports by visa-free reach, merges live country metadata,
//! and exports shaded boundary maps.
//!
//! Usage:
//!   passport-explorer list --region "Strong European" --sort to --desc
//!   passport-explorer country United Kingdom
//!   passport-explorer featured
//!   passport-explorer map --metric from --output map.geojson
//!   passport-explorer --offline snapshot --output snapshot.json

mod app;
mod render;

use anyhow::{Context, Result};
use app::Explorer;
use clap::{Parser, Subcommand};
use country_sources::{
    SourceConfig, DEFAULT_BOUNDARIES_URL, DEFAULT_GEOLOCATION_URL, DEFAULT_REST_BASE,
};
use passport_core::merge::{FLOOR_CAN_TRAVEL_FROM, FLOOR_CAN_TRAVEL_TO};
use passport_core::{
    ListQuery, MergeConfig, Metric, MobilityFloor, ReferenceTable, RegionFilter, SortDirection,
    SortKey,
};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "passport-explorer",
    version,
    about = "Explore passport strength and visa-free mobility"
)]
struct Cli {
    /// Reference table JSON (defaults to the built-in table)
    #[arg(long, global = true, env = "PASSPORT_REFERENCE")]
    reference: Option<PathBuf>,

    /// Skip every external source
    #[arg(long, global = true)]
    offline: bool,

    /// Visa-free destinations assumed for countries missing from the reference table
    #[arg(long, global = true, default_value_t = FLOOR_CAN_TRAVEL_TO)]
    floor_to: u32,

    /// Visa-free origins assumed for countries missing from the reference table
    #[arg(long, global = true, default_value_t = FLOOR_CAN_TRAVEL_FROM)]
    floor_from: u32,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "PASSPORT_TIMEOUT_SEC", default_value_t = 5)]
    timeout_sec: u64,

    #[arg(long, global = true, env = "PASSPORT_REST_BASE", default_value = DEFAULT_REST_BASE)]
    rest_base: String,

    #[arg(long, global = true, env = "PASSPORT_GEO_URL", default_value = DEFAULT_GEOLOCATION_URL)]
    geo_url: String,

    #[arg(long, global = true, env = "PASSPORT_BOUNDARIES_URL", default_value = DEFAULT_BOUNDARIES_URL)]
    boundaries_url: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List passports with search, region filter, and sorting
    List {
        /// Case-insensitive substring of the country name
        #[arg(short, long, default_value = "")]
        search: String,

        /// "all", "top-tier", or a region bucket such as "Strong European"
        #[arg(short, long, default_value = "all")]
        region: RegionFilter,

        /// country, to, or from
        #[arg(long, default_value = "country")]
        sort: SortKey,

        #[arg(long)]
        desc: bool,

        /// One row per metadata country, with floor counts for unranked ones
        #[arg(long)]
        catalog: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show the detail view for one country
    Country {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Narrow the travel lists to names containing this text
        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the featured passport for this location
    Featured {
        /// Use this country instead of geolocation
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Write boundary GeoJSON shaded by visa-free counts
    Map {
        /// to or from
        #[arg(long, default_value = "to")]
        metric: Metric,

        #[arg(short, long)]
        output: PathBuf,

        /// Read boundaries from a local GeoJSON file instead of the feed
        #[arg(long)]
        boundaries_file: Option<PathBuf>,
    },

    /// Write all merged records with generation metadata
    Snapshot {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        catalog: bool,
    },
}

impl Cli {
    fn source_config(&self) -> Option<SourceConfig> {
        if self.offline {
            return None;
        }
        Some(SourceConfig {
            rest_base: self.rest_base.trim_end_matches('/').to_string(),
            geolocation_url: self.geo_url.clone(),
            boundaries_url: self.boundaries_url.clone(),
            timeout_sec: self.timeout_sec,
            ..SourceConfig::default()
        })
    }

    fn merge_config(&self) -> Result<MergeConfig> {
        let floor = MobilityFloor::new(self.floor_to, self.floor_from)
            .context("invalid --floor-to/--floor-from")?;
        Ok(MergeConfig { floor })
    }

    fn load_table(&self) -> Result<ReferenceTable> {
        match &self.reference {
            Some(path) => ReferenceTable::load(path)
                .with_context(|| format!("loading reference table {}", path.display())),
            None => ReferenceTable::builtin().context("loading built-in reference table"),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "passport_explorer=debug,passport_core=debug,country_sources=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    info!("Writing {:?}", path);
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut writer = BufWriter::new(io::stdout());
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let table = cli.load_table()?;
    info!("Loaded {} reference countries", table.len());

    let explorer = Explorer::new(table, cli.merge_config()?, cli.source_config())?;

    let liveness = explorer.liveness();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            liveness.tear_down();
        }
    });

    let mut out = BufWriter::new(io::stdout());

    match cli.command {
        Command::List {
            search,
            region,
            sort,
            desc,
            catalog,
            json,
        } => {
            let records = explorer.records(catalog).await?;
            let query = ListQuery {
                search,
                region,
                sort_key: sort,
                direction: if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            };
            let rows = query.apply(&records);
            if json {
                print_json(&rows)?;
            } else {
                render::write_list(&mut out, &query, &rows)?;
            }
        }

        Command::Country { name, filter, json } => {
            let name = name.join(" ");
            let detail = explorer
                .detail(&name)
                .await?
                .with_context(|| format!("{} is not in the reference table", name))?;
            if json {
                print_json(&detail)?;
            } else {
                render::write_detail(&mut out, &detail, filter.as_deref())?;
            }
        }

        Command::Featured { country, json } => {
            let featured = explorer
                .featured(country.as_deref())
                .await?
                .context("default featured country is missing from the reference table")?;
            if json {
                print_json(&featured)?;
            } else {
                render::write_featured(&mut out, &featured)?;
            }
        }

        Command::Map {
            metric,
            output,
            boundaries_file,
        } => {
            let shaded = explorer.map(metric, boundaries_file.as_deref()).await?;
            write_json(&output, &shaded)?;
        }

        Command::Snapshot { output, catalog } => {
            let snapshot = explorer.snapshot(catalog).await?;
            info!(
                "Snapshot of {} records ({} with metadata)",
                snapshot.records.len(),
                snapshot.metadata_countries
            );
            write_json(&output, &snapshot)?;
        }
    }

    out.flush()?;
    Ok(())
}
