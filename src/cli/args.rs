//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// CNDEV-based MLU telemetry tool
///
/// Inspect Cambricon MLU cards: identity, health, memory, utilization and
/// per-process memory usage.
#[derive(Parser, Debug)]
#[command(name = "cndev")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CNDEV_CONFIG")]
    pub config: Option<String>,

    /// Path to libcndev.so (overrides the configured search paths)
    #[arg(long, global = true, env = "CNDEV_LIBRARY")]
    pub library: Option<String>,

    /// Target device by index (0-based)
    #[arg(short, long, global = true)]
    pub device: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all detected MLU cards
    List,

    /// Show memory and utilization
    Info,

    /// Run a health check (blocks for the settling delay)
    Health(HealthArgs),

    /// Show processes using device memory
    Processes(ProcessesArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the health command
#[derive(Parser, Debug)]
pub struct HealthArgs {
    /// Settling delay in seconds before the query
    #[arg(long)]
    pub delay: Option<u64>,
}

/// Arguments for the processes command
#[derive(Parser, Debug)]
pub struct ProcessesArgs {
    /// Include empty (pid 0) slots
    #[arg(short, long)]
    pub all: bool,

    /// Root of the host procfs used to resolve names
    #[arg(long)]
    pub proc_root: Option<String>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let args = Cli::try_parse_from(["cndev", "list"]).unwrap();
        assert!(matches!(args.command, Commands::List));
    }

    #[test]
    fn test_cli_parse_health_delay() {
        let args = Cli::try_parse_from(["cndev", "health", "--delay", "3"]).unwrap();
        match args.command {
            Commands::Health(h) => assert_eq!(h.delay, Some(3)),
            _ => panic!("expected health"),
        }
    }

    #[test]
    fn test_cli_parse_processes_global_flags() {
        let args = Cli::try_parse_from([
            "cndev",
            "processes",
            "--all",
            "--device",
            "1",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.device, Some(1));
        assert!(matches!(args.format, OutputFormat::Json));
        match args.command {
            Commands::Processes(p) => assert!(p.all),
            _ => panic!("expected processes"),
        }
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }
}
