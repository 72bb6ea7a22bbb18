//! Command line interface for the N-Queens enumerator

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use nqueens_sat::{
    config::{CliOverrides, OutputFormat, Settings},
    count_up_to,
    utils::SolutionFormatter,
    SolutionEnumerator,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "nqueens_sat")]
#[command(about = "Enumerate N-Queens solutions with a bit-vector SAT encoding")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by the solving commands
#[derive(Args)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Do not derive reflected solutions from each model
    #[arg(long)]
    no_symmetry: bool,

    /// Time limit per oracle query, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every solution as a board
    Solve {
        /// Board size (overrides config)
        n: Option<usize>,

        /// Stop after this many solutions (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Also save the solutions into this directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the number of solutions
    Count {
        /// Board size (overrides config)
        n: Option<usize>,

        /// Count every board size from 1 up to N
        #[arg(long)]
        up_to: bool,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { n, limit, format, output, common } => {
            configure_logging(common.verbose);
            let overrides = CliOverrides {
                size: n,
                max_solutions: limit,
                timeout_seconds: common.timeout,
                no_symmetry: common.no_symmetry,
                format,
                output_dir: output,
            };
            let settings = load_settings(&common.config, &overrides)?;
            solve_command(&settings, &mut std::io::stdout().lock())
        }
        Commands::Count { n, up_to, common } => {
            configure_logging(common.verbose);
            let overrides = CliOverrides {
                size: n,
                timeout_seconds: common.timeout,
                no_symmetry: common.no_symmetry,
                ..Default::default()
            };
            let settings = load_settings(&common.config, &overrides)?;
            count_command(&settings, up_to, &mut std::io::stdout().lock())
        }
        Commands::Setup { directory, force } => {
            configure_logging(false);
            setup_command(&directory, force)
        }
    }
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // Boards go to stdout, so diagnostics stay on stderr.
    let _ = env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .try_init();
}

fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        info!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let start_time = Instant::now();
    let mut enumerator = SolutionEnumerator::with_options(
        settings.board.size,
        &settings.enumerator_options(),
    )
    .context("Failed to encode the board")?;

    let limit = settings.solver.max_solutions.unwrap_or(usize::MAX);
    let mut saved = Vec::new();
    for (index, solution) in enumerator.by_ref().take(limit).enumerate() {
        let solution = solution.context("Enumeration failed")?;
        write!(out, "{}", SolutionFormatter::format(index, &solution, settings.output.format)?)?;
        if settings.output.output_directory.is_some() {
            saved.push(solution);
        }
    }

    if let Some(ref directory) = settings.output.output_directory {
        SolutionFormatter::save_solutions(&saved, directory, settings.output.format)
            .context("Failed to save solutions")?;
        info!("Solutions saved to {}", directory.display());
    }

    info!(
        "Finished in {:.3}s\n{}",
        start_time.elapsed().as_secs_f64(),
        enumerator.statistics()
    );
    Ok(())
}

fn count_command<W: Write>(settings: &Settings, up_to: bool, out: &mut W) -> Result<()> {
    let options = settings.enumerator_options();

    if up_to {
        let counts = count_up_to(settings.board.size, &options)
            .context("Enumeration failed")?;
        for (size, total) in counts {
            writeln!(out, "{}: {}", size, total)?;
        }
    } else {
        let total = nqueens_sat::count_solutions(settings.board.size, &options)
            .context("Enumeration failed")?;
        writeln!(out, "{}", total)?;
    }
    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    let config_path = directory.join("config/default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }
    Ok(())
}
