use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trivolve::{EvolutionLauncherBuilder, EvolutionOptions, Result};

/// Approximate an image with translucent triangles.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the JSON configuration file
    config: PathBuf,
}

fn run(cli: &Cli) -> Result<()> {
    let options = EvolutionOptions::from_json_file(&cli.config)?;
    info!(
        config = %cli.config.display(),
        image = %options.get_image_path().display(),
        triangles = options.get_num_triangles(),
        population = options.get_population_size(),
        generations = options.get_num_generations(),
        "Starting evolution"
    );

    let launcher = EvolutionLauncherBuilder::new().with_options(options).build()?;
    let result = launcher.evolve()?;

    info!(
        fitness = result.score,
        checkpoint = %launcher.checkpoints().path().display(),
        "Evolution finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
