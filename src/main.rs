use clap::Parser;
use hqz_export::app::{Overrides, run_export};
use hqz_export::io::config::Config;
use log::{error, info};
use std::process::ExitCode;

/// Scene exporter for the HQZ renderer
#[derive(Parser, Debug)]
#[command(name = "hqz-export")]
#[command(about = "Exports a TOML-described scene to HQZ JSON documents, one per frame")]
struct Cli {
    /// Scene/config file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Output path prefix, overrides `export.output`
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Export the whole frame range
    #[arg(long)]
    animation: bool,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_level(true)
        .init();

    info!("Loading config: {}", cli.config);
    let mut config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    Overrides {
        output: cli.output,
        animation: cli.animation,
        compact: cli.compact,
    }
    .apply(&mut config);

    match run_export(&config) {
        Ok(report) => {
            for (frame, path) in &report.frames {
                info!("Frame {} -> {}", frame, path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Export failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
