//! cndev - CNDEV-based MLU telemetry tool
//!
//! A command-line tool for inspecting Cambricon MLU cards.

use clap::Parser;
use cndev::cli::args::{generate_completions, Cli, Commands};
use cndev::cndev::CndevManager;
use cndev::commands::{run_health, run_info, run_list, run_processes};
use cndev::config::{Config, ConfigBuilder};
use cndev::error::{AppError, CndevError};
use cndev::process::ProcFs;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return;
    }

    // The config can enable verbose output too, so it is loaded before
    // the logger exists.
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log_builder(env_logger::Env::default(), cli.verbose).init();
            fail(e);
        }
    };

    log_builder(env_logger::Env::default(), config.general.verbose).init();

    if let Err(e) = run(&cli, &config) {
        fail(e);
    }
}

/// Logger honouring `RUST_LOG`, raised to debug when verbose
fn log_builder(env: env_logger::Env, verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env.default_filter_or("warn"));
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
}

fn fail(err: AppError) -> ! {
    log::error!("{}", err);
    print_error(&err);
    std::process::exit(1);
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let health_delay = match &cli.command {
        Commands::Health(args) => args.delay,
        _ => None,
    };
    let proc_root = match &cli.command {
        Commands::Processes(args) => args.proc_root.clone(),
        _ => None,
    };

    let config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_library_path(cli.library.clone())
        .with_health_delay(health_delay)
        .with_proc_root(proc_root)
        .build()?;
    Ok(config)
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    let manager = CndevManager::initialize(&config.library)?;

    let result = match &cli.command {
        Commands::List => run_list(&manager, cli.format, cli.device),

        Commands::Info => run_info(&manager, cli.format, cli.device),

        Commands::Health(_) => {
            run_health(&manager, cli.format, cli.device, config.health.delay())
        }

        Commands::Processes(args) => {
            let table = ProcFs::new(&config.process.proc_root);
            run_processes(&manager, &table, args, cli.format, cli.device)
        }

        Commands::Completions { .. } => Ok(()),
    };

    // Release even when the command failed; report the first error.
    let shutdown = manager.shutdown();
    result?;
    shutdown?;
    Ok(())
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Cndev(CndevError::LibraryNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Make sure the Cambricon driver and Neuware SDK are installed.");
            eprintln!("      Use --library or CNDEV_LIBRARY to point at libcndev.so.");
        }
        AppError::NoDevicesFound => {
            eprintln!();
            eprintln!("Hint: Make sure you have a Cambricon MLU card installed.");
            eprintln!("      Check 'cnmon' for device detection.");
        }
        _ => {}
    }
}
