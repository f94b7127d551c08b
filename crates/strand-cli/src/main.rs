#![forbid(unsafe_code)]

mod cmd;
mod document;
mod output;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::{Path, PathBuf};
use strand_core::config::{DEFAULT_CONFIG_FILE, StrandConfig, load_config};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "strand: graph topology simplification",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ./strand.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn load_config(&self) -> anyhow::Result<StrandConfig> {
        let loaded = match &self.config {
            Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
            Some(path) => load_config(path),
            None => load_config(Path::new(DEFAULT_CONFIG_FILE)),
        };
        loaded.context("Failed to load configuration")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Check a graph for cycles",
        long_about = "Report whether a graph contains a cycle and which nodes are on or between cycles.",
        after_help = "EXAMPLES:\n    # Undirected check\n    strand cycles network.json\n\n    # Treat edges as from -> to\n    strand cycles network.json --directed --json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Split a graph into connected components",
        after_help = "EXAMPLES:\n    strand partition network.json --json"
    )]
    Partition(cmd::partition::PartitionArgs),

    #[command(
        about = "Collapse degree-2 chains into single edges",
        long_about = "Replace every maximal chain of degree-2 nodes with one edge whose id joins the ids of the edges it replaces.",
        after_help = "EXAMPLES:\n    # Print the fused graph\n    strand fuse network.json\n\n    # Write it to a file\n    strand fuse network.json --output fused.json"
    )]
    Fuse(cmd::fuse::FuseArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRAND_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "strand=debug,info"
        } else {
            "strand=info,warn"
        })
    });

    let format = env::var("STRAND_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match &cli.command {
        Commands::Cycles(args) => cmd::cycles::run_cycles(args, output),
        Commands::Partition(args) => cmd::partition::run_partition(args, output),
        Commands::Fuse(args) => {
            let config = cli.load_config()?;
            debug!(?config, "configuration loaded");
            cmd::fuse::run_fuse(args, config.fuse, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["strand", "partition", "g.json", "--json"]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["strand", "cycles", "g.json"]);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn fuse_output_flag_parses() {
        let cli = Cli::parse_from(["strand", "fuse", "g.json", "-o", "out.json"]);
        match cli.command {
            Commands::Fuse(args) => assert_eq!(args.output, Some(PathBuf::from("out.json"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.toml");
        let cli = Cli::parse_from(["strand", "--config", missing.to_str().expect("utf8 path"), "fuse", "g.json"]);
        let err = cli.load_config().expect_err("missing config");
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn explicit_config_is_loaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[fuse]\nisolated_cycles = \"preserve\"\n").expect("write config");
        let cli = Cli::parse_from(["strand", "fuse", "g.json", "--config", path.to_str().expect("utf8 path")]);
        let config = cli.load_config().expect("load");
        assert_eq!(config.fuse.isolated_cycles, strand_core::config::IsolatedCycles::Preserve);
    }
}
