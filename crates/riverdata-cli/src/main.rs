mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::normalize::Kind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "riverdata",
    version,
    about = "Client and offline data build for the EA flood-monitoring API"
)]
struct Cli {
    /// JSON client config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stations, measures, catchments and rivers tables from API dumps
    Build {
        /// Stations dump (`/id/stations` response or bare array)
        #[arg(long, value_name = "FILE", default_value = "data/stations.json")]
        stations: PathBuf,

        /// Measures dump (`/id/measures` response or bare array)
        #[arg(long, value_name = "FILE", default_value = "data/measures.json")]
        measures: PathBuf,

        /// Directory the four tables are written to
        #[arg(short = 'O', long = "out", value_name = "DIR", default_value = "data/generated")]
        out: PathBuf,
    },
    /// Normalize a raw API payload read from a file
    Normalize {
        #[arg(value_enum)]
        kind: Kind,

        /// JSON file holding the payload or an `items` envelope
        file: PathBuf,

        /// Sort readings oldest first (readings only)
        #[arg(long)]
        ascending: bool,

        /// Sort readings newest first (readings only)
        #[arg(long)]
        descending: bool,
    },
    /// Split a measure id into its parts
    ParseId {
        /// Measure id or URI, e.g. 3400TH-flow--i-15_min-m3_s
        id: String,
    },
    /// Query the live API
    Fetch {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table", global = true)]
        output: String,

        #[command(subcommand)]
        action: FetchAction,
    },
}

#[derive(Subcommand)]
enum FetchAction {
    /// One station with its measures
    Station { id: String },
    /// A page of stations
    Stations {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Recent readings for every measure of a station
    Readings {
        id: String,

        /// Only readings after this ISO 8601 timestamp
        #[arg(long)]
        since: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        ascending: bool,

        #[arg(long)]
        descending: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            stations,
            measures,
            out,
        } => commands::build::run(&stations, &measures, &out),
        Commands::Normalize {
            kind,
            file,
            ascending,
            descending,
        } => commands::normalize::run(kind, &file, ascending, descending),
        Commands::ParseId { id } => commands::parse_id::run(&id),
        Commands::Fetch { output, action } => {
            commands::load_client_config(cli.config.as_deref(), cli.base_url).and_then(|config| {
                match action {
                    FetchAction::Station { id } => commands::fetch::station(config, &id, &output),
                    FetchAction::Stations { limit } => {
                        commands::fetch::stations(config, limit, &output)
                    }
                    FetchAction::Readings {
                        id,
                        since,
                        limit,
                        ascending,
                        descending,
                    } => commands::fetch::readings(
                        config,
                        &id,
                        commands::fetch::readings_options(since, limit, ascending, descending),
                        &output,
                    ),
                }
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
