use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tether: drive a content-surface bridge without a rendering engine.
#[derive(Parser, Debug)]
#[command(name = "tether", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the config and print the effective settings as JSON.
    CheckConfig,
    /// Run a JSON-lines scenario against a scripted host and print every
    /// host-bound call as a JSON line.
    Replay {
        /// Scenario file, one step per line.
        file: PathBuf,
    },
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_replay_with_global_flags() {
        let args = Args::try_parse_from([
            "tether",
            "replay",
            "scenario.jsonl",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.command, Command::Replay { ref file } if file.ends_with("scenario.jsonl")));
    }

    #[test]
    fn parses_check_config() {
        let args = Args::try_parse_from(["tether", "--config", "a.toml", "check-config"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("a.toml")));
        assert!(matches!(args.command, Command::CheckConfig));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["tether"]).is_err());
    }
}
