mod cli;
mod replay;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use tether_common::TetherError;
use tether_config::TetherConfig;
use tracing_subscriber::EnvFilter;

use cli::Command;

/// Load the config for a subcommand. An explicit path must exist and
/// validate; otherwise the platform default is used, created if missing.
fn load_config(path: Option<&Path>) -> Result<TetherConfig, TetherError> {
    let config = match path {
        Some(p) => tether_config::load_strict(p)?,
        None => tether_config::load_config()?,
    };
    Ok(config)
}

fn check_config(config: &TetherConfig) -> Result<(), TetherError> {
    tether_config::validation::validate(config)?;
    println!("{}", tether_config::config_to_json(config));
    Ok(())
}

fn run_replay(config: &TetherConfig, file: &Path) -> Result<(), TetherError> {
    let input = BufReader::new(File::open(file)?);
    let stdout = io::stdout();
    let steps = replay::run(config, input, stdout.lock())?;
    tracing::info!(steps, file = %file.display(), "replay finished");
    Ok(())
}

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Config comes first so its log level can seed the filter
    let config = load_config(args.config.as_deref());

    let log_directive = args
        .log_level
        .clone()
        .or_else(|| {
            config
                .as_ref()
                .ok()
                .map(|c| c.logging.level.as_directive().to_string())
        })
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Tether v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config.and_then(|config| match &args.command {
        Command::CheckConfig => check_config(&config),
        Command::Replay { file } => run_replay(&config, file),
    });

    if let Err(e) = result {
        tracing::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
