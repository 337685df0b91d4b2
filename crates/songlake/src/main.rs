//! Songlake CLI: batch JSON to star-schema Parquet.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use songlake::{Config, init_tracing, run_pipeline};

/// JSON to star-schema Parquet batch tool.
#[derive(Parser, Debug)]
#[command(name = "songlake")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args = Args::parse();

    let config = match Config::from_file(&args.config.to_string_lossy()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Starting songlake: {} + {} -> {}",
        config.source.song_data, config.source.log_data, config.sink.path
    );

    match run_pipeline(&config).await {
        Ok(stats) => {
            info!(
                "Done: {} songplays, {} files written",
                stats.songplays.rows,
                stats.total_files()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Pipeline failed: {e}");
            ExitCode::FAILURE
        }
    }
}
