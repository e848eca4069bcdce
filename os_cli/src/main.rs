//! # histo
//!
//! Bin JSON records and work with filter action files.
//!
//! ```bash
//! histo bin --input tracks.geojson --field SPEED --method numeric --width 5 --sort key
//! histo bin --input tracks.geojson --field TYPE --export
//! histo actions --input actions.xml --features tracks.geojson
//! ```

mod commands;
mod config;
mod error;
mod input;

use clap::{Parser, Subcommand};
use commands::{ActionArgs, BinArgs};
use config::CliConfig;
use os_filter::{log_error, log_info, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "histo")]
#[command(about = "Bin records and evaluate filter actions")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group records into bins, optionally exporting them as a filter
    Bin(BinArgs),

    /// Parse a filter action file and match it against records
    Actions(ActionArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_global_logging_with_preferences(&config.logging) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    log_info!("histo starting");

    let result = match &cli.command {
        Commands::Bin(args) => commands::run_bin(args, &config),
        Commands::Actions(args) => commands::run_actions(args, &config),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error!(e.error_code(), "Command failed", "error" => e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bin_flags() {
        let cli = Cli::parse_from([
            "histo", "bin", "-i", "in.json", "-f", "SPEED", "-m", "numeric", "--width", "2.5",
            "--offset", "-1", "--sort", "label", "--desc", "--config", "histo.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("histo.toml")));
        let Commands::Bin(args) = cli.command else {
            panic!("expected bin command");
        };
        assert_eq!(args.method, Some(commands::MethodKind::Numeric));
        assert_eq!(args.offset, Some(-1.0));
        assert_eq!(args.sort, Some(commands::SortKind::Label));
        assert!(args.desc);
    }
}
