// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orderly - turns free-form order messages into structured orders.
//!
//! This is the binary entry point for the Orderly bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config_cmd;
mod parse;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orderly_config::{ConfigError, OrderlyConfig};

/// Orderly - turns free-form order messages into structured orders.
#[derive(Parser, Debug)]
#[command(name = "orderly", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Telegram bot.
    Serve,
    /// Parse order text and print the extracted blocks as JSON.
    Parse {
        /// File to read; standard input when omitted.
        file: Option<PathBuf>,
    },
    /// Validate the configuration and print a summary.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<OrderlyConfig, Vec<ConfigError>> {
    match path {
        Some(path) => orderly_config::load_and_validate_path(path),
        None => orderly_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            orderly_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Parse { file }) => parse::run_parse(file.as_deref()),
        Some(Commands::Config) => {
            println!("{}", config_cmd::summary(&config));
            Ok(())
        }
        None => {
            println!("orderly: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["orderly", "parse", "orders.txt"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Parse { file: Some(ref f) }) if f == &PathBuf::from("orders.txt")
        ));

        let cli = Cli::try_parse_from(["orderly", "--config", "x.toml", "serve"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderly.toml");
        std::fs::write(&path, "[agent]\nname = \"banco\"\n").unwrap();
        let config = load_config(Some(&path)).expect("file config should be valid");
        assert_eq!(config.agent.name, "banco");
    }
}
