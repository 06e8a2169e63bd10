//! cyclops CLI
//!
//! Thin wrapper over the library: ingest a constellation's catalog data,
//! chart a stored constellation at an epoch offset, or audit the reference
//! data. All pipeline logic lives in the library.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use cyclops::core::ChartRenderer;
use cyclops::{
    project, ConstellationDefinition, CyclopsConfig, IngestionController, JsonCatalogSource,
    QueryAdapter, SqliteStore, StarStore, ViewMode, YEARS_PER_MILLENNIUM,
};

/// Cyclops: constellation ingestion and temporal star charts.
#[derive(Parser, Debug)]
#[command(name = "cyclops")]
#[command(version = cyclops::VERSION)]
#[command(about = "Ingest constellation catalogs and chart them across millennia")]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Query, validate and persist a constellation snapshot
    Ingest {
        /// Constellation name, as keyed in the reference data
        constellation: String,
    },
    /// Chart a stored constellation at an epoch offset
    Chart {
        /// Constellation name, as keyed in the reference data
        constellation: String,
        /// Millennium offset: positive = future, negative = past
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        millennia: i64,
        /// View mode: apparent skips the light-travel correction
        #[arg(long, value_enum, default_value = "apparent")]
        view: ViewArg,
        /// Output SVG path (default: <constellation>.svg)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Also print the projection report as JSON to stdout
        #[arg(long)]
        report: bool,
    },
    /// Audit the reference data and report per-constellation counts
    Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    /// As seen from Earth (no light-travel correction)
    Apparent,
    /// True positions (light-travel correction applied)
    Real,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Apparent => ViewMode::Apparent,
            ViewArg::Real => ViewMode::Real,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CyclopsConfig> {
    match &cli.config {
        Some(path) => {
            CyclopsConfig::load(path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(CyclopsConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Ingest { constellation } => {
            let definition = ConstellationDefinition::from_file(&config.definition_path)
                .context("loading constellation definition")?;
            let source = JsonCatalogSource::from_file(&config.catalog_path)
                .context("loading catalog extract")?;
            let adapter =
                QueryAdapter::new(source, &definition).with_timeout(config.query_timeout());
            let store = SqliteStore::new(&config.database_path);
            let controller = IngestionController::new().with_max_attempts(config.max_attempts);

            eprintln!("cyclops: ingesting '{constellation}'...");
            let report = controller.ingest(&adapter, &store, constellation)?;
            eprintln!(
                "cyclops: stored {} stars for '{}' in {} attempt(s)",
                report.stars, report.constellation, report.attempts
            );
        }

        Command::Chart {
            constellation,
            millennia,
            view,
            output,
            report,
        } => {
            let store = SqliteStore::new(&config.database_path);
            let set = store.most_recent(constellation)?;
            let offset_years = *millennia as f64 * YEARS_PER_MILLENNIUM;

            let (graph, projection) = project(&set, offset_years, (*view).into())?;
            let svg = ChartRenderer::render_svg(&graph);

            let path = output.clone().unwrap_or_else(|| {
                PathBuf::from(format!(
                    "{}.svg",
                    constellation.to_lowercase().replace(' ', "_")
                ))
            });
            std::fs::write(&path, svg)
                .with_context(|| format!("writing chart {}", path.display()))?;

            if *report {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            }
            eprintln!(
                "cyclops: charted '{}' at {millennia} millennia ({} stars, {} edges)",
                constellation,
                graph.vertex_count(),
                graph.edge_count()
            );
            println!("{}", path.display());
        }

        Command::Check => {
            let definition = ConstellationDefinition::from_file(&config.definition_path)
                .context("loading constellation definition")?;
            // loading already enforced closure; report the shape
            for name in definition.names() {
                let stars = definition.stars(name)?.len();
                let edges = definition.edge_count(name)?;
                println!("{name}: {stars} stars, {edges} edges");
            }
        }
    }

    Ok(())
}
