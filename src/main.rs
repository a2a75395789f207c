//! ARTCC boundary converter CLI
//!
//! Reads the NASR ARTCC boundary file and writes facility polygons as
//! pipe-delimited rows with embedded GeoJSON.

use arbgeo::{
    export::ExportConfig,
    pipeline::{convert_file, ConvertConfig, ConvertError},
};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "arbgeo")]
#[command(about = "Process the ARTCC boundary file from the NASR subscription", long_about = None)]
struct Cli {
    /// Location of the ARB.txt file within the NASR subscriber file
    arb_file: PathBuf,

    /// Output file
    #[arg(default_value = "FAVs_GeoJSON.csv")]
    out_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "ARBGEO_LOG_LEVEL")]
    log_level: String,

    /// Also export facilities that only have one of the high/low strata
    #[arg(long)]
    include_single_stratum: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConvertConfig {
        export: ExportConfig {
            exclude_single_stratum: !cli.include_single_stratum,
        },
    };

    match convert_file(&cli.arb_file, &cli.out_file, &config) {
        Ok(stats) => {
            tracing::info!("Final statistics:");
            tracing::info!("  Records read: {}", stats.records);
            tracing::info!("  Boundaries sealed: {}", stats.boundaries);
            tracing::info!("  Facilities: {}", stats.facilities);
            tracing::info!(
                "  Matching/divergent/single: {}/{}/{}",
                stats.matching,
                stats.divergent,
                stats.single_stratum
            );
            if stats.discarded_records > 0 {
                tracing::info!("  Discarded trailing records: {}", stats.discarded_records);
            }
            if stats.overwritten > 0 {
                tracing::info!("  Overwritten boundaries: {}", stats.overwritten);
            }
            tracing::info!("  Rows written: {}", stats.rows);
            Ok(())
        }
        Err(ConvertError::MissingInput(_)) => {
            println!("Path does not exist.");
            Ok(())
        }
        Err(ConvertError::Io(e)) => Err(e.into()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
