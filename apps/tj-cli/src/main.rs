use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tj_core::ModelRef;
use tj_results::{
    DEFAULT_SOLVER_NAME, ExportOptions, Results, ResultsError, aggregate, tabular,
};
use tj_viz::{DEFAULT_PALETTE, Figure, FigureOptions, VizError, std_dev_range};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Viz(#[from] VizError),

    #[error("No input runs given")]
    NoInput,
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "tj-cli")]
#[command(about = "TrajFlow CLI - stochastic simulation ensemble tool", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunInput {
    /// Run tables (CSV files) or export directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Model name recorded on every loaded run
    #[arg(long, default_value = "model")]
    model: String,
    /// Solver name recorded on every loaded run
    #[arg(long, default_value = DEFAULT_SOLVER_NAME)]
    solver: String,
}

#[derive(Args)]
struct ExportArgs {
    /// Parent directory of the export (defaults to the current directory)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Name for the export directory and files (defaults to the ensemble title)
    #[arg(long)]
    nametag: Option<String>,
    /// Suffix for the export directory (defaults to a timestamp)
    #[arg(long)]
    stamp: Option<String>,
}

impl ExportArgs {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            path: self.out.clone(),
            nametag: self.nametag.clone(),
            stamp: self.stamp.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show run count, title and per-run status of an ensemble
    Summary {
        #[command(flatten)]
        input: RunInput,
    },
    /// Export the per-index mean of an ensemble
    Average {
        #[command(flatten)]
        input: RunInput,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Export the per-index standard deviation of an ensemble
    Stddev {
        #[command(flatten)]
        input: RunInput,
        /// Delta degrees of freedom (divisor is N - ddof)
        #[arg(long, default_value_t = 0)]
        ddof: usize,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Export every run of an ensemble again under a new name
    Export {
        #[command(flatten)]
        input: RunInput,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Concatenate two ensembles and summarize the result
    Concat {
        #[command(flatten)]
        input: RunInput,
        /// Runs of the second ensemble
        #[arg(long, required = true, num_args = 1..)]
        right: Vec<PathBuf>,
        /// Model of the second ensemble (defaults to --model)
        #[arg(long)]
        right_model: Option<String>,
        /// Solver of the second ensemble (defaults to --solver)
        #[arg(long)]
        right_solver: Option<String>,
    },
    /// Print a JSON figure description for an external renderer
    Figure {
        #[command(flatten)]
        input: RunInput,
        /// Species to include (repeatable; all when omitted)
        #[arg(long = "species")]
        species: Vec<String>,
        /// Plot each run in its own subplot
        #[arg(long)]
        multiple: bool,
        /// Plot the mean with a standard deviation range instead
        #[arg(long)]
        range: bool,
        /// Delta degrees of freedom for --range
        #[arg(long, default_value_t = 0)]
        ddof: usize,
    },
    /// Check whether native solver toolchain executables are installed
    Probe,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Summary { input } => cmd_summary(&input),
        Commands::Average { input, export } => cmd_average(&input, &export),
        Commands::Stddev {
            input,
            ddof,
            export,
        } => cmd_stddev(&input, ddof, &export),
        Commands::Export { input, export } => cmd_export(&input, &export),
        Commands::Concat {
            input,
            right,
            right_model,
            right_solver,
        } => cmd_concat(&input, &right, right_model, right_solver),
        Commands::Figure {
            input,
            species,
            multiple,
            range,
            ddof,
        } => cmd_figure(&input, species, multiple, range.then_some(ddof)),
        Commands::Probe => {
            cmd_probe();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        // Ensemble warnings are logged at warn level when attached.
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_runs(paths: &[PathBuf], model: &ModelRef, solver: &str) -> CliResult<Results> {
    if paths.is_empty() {
        return Err(CliError::NoInput);
    }
    let mut runs = Vec::new();
    for path in paths {
        if path.is_dir() {
            runs.extend(Results::import_tabular(path, model, solver)?);
        } else {
            runs.push(tabular::read_csv(path, model, solver)?);
        }
    }
    tracing::info!(runs = runs.len(), model = %model, "loaded runs");
    Ok(Results::new(runs))
}

fn load_input(input: &RunInput) -> CliResult<Results> {
    load_runs(&input.inputs, &ModelRef::new(&input.model), &input.solver)
}

fn cmd_summary(input: &RunInput) -> CliResult<()> {
    let results = load_input(input)?;
    print_summary(&results)
}

fn print_summary(results: &Results) -> CliResult<()> {
    println!("Ensemble: {}", results.validate_title()?);
    println!("  Runs: {}", results.len());
    println!(
        "  Homogeneous model: {}",
        if results.validate_model()? { "yes" } else { "no" }
    );
    println!(
        "  Homogeneous solver: {}",
        if results.validate_solver()? { "yes" } else { "no" }
    );
    for (i, run) in results.iter().enumerate() {
        let species: Vec<&str> = run
            .series_names()
            .filter(|name| *name != tj_results::TIME)
            .collect();
        println!(
            "  [{}] {} time points, status {} (rc={}), species: {}",
            i,
            run.len(),
            run.status(),
            run.return_code(),
            species.join(", ")
        );
    }
    Ok(())
}

fn print_export(directory: &Path, runs: usize) {
    println!("✓ Exported {} run(s) to {}", runs, directory.display());
}

fn cmd_average(input: &RunInput, export: &ExportArgs) -> CliResult<()> {
    let results = load_input(input)?;
    let mean = results.average_ensemble()?;
    let directory = mean.export_tabular(&export.options())?;
    print_export(&directory, mean.len());
    Ok(())
}

fn cmd_stddev(input: &RunInput, ddof: usize, export: &ExportArgs) -> CliResult<()> {
    let results = load_input(input)?;
    let summary = aggregate::summary(results.runs(), ddof)?.into_inner();
    println!("Standard deviation with ddof = {}", summary.ddof);
    let stddev = Results::from_run(summary.stddev);
    let directory = stddev.export_tabular(&export.options())?;
    print_export(&directory, stddev.len());
    Ok(())
}

fn cmd_export(input: &RunInput, export: &ExportArgs) -> CliResult<()> {
    let results = load_input(input)?;
    let directory = results.export_tabular(&export.options())?;
    print_export(&directory, results.len());
    Ok(())
}

fn cmd_concat(
    input: &RunInput,
    right: &[PathBuf],
    right_model: Option<String>,
    right_solver: Option<String>,
) -> CliResult<()> {
    let left = load_input(input)?;
    let right_model = ModelRef::new(right_model.unwrap_or_else(|| input.model.clone()));
    let right_solver = right_solver.unwrap_or_else(|| input.solver.clone());
    let right = load_runs(right, &right_model, &right_solver)?;

    let combined = left.concatenate(&right)?.into_inner();
    print_summary(&combined)
}

fn cmd_figure(
    input: &RunInput,
    species: Vec<String>,
    multiple: bool,
    range_ddof: Option<usize>,
) -> CliResult<()> {
    let results = load_input(input)?;
    let options = FigureOptions {
        multiple_graphs: multiple,
        included_species: species,
        ..FigureOptions::default()
    };
    let figure = match range_ddof {
        Some(ddof) => std_dev_range(&results, ddof, &options)?.into_inner(),
        None => Figure::from_results(&results, DEFAULT_PALETTE, &options)?,
    };
    println!("{}", figure.to_json()?);
    Ok(())
}

fn cmd_probe() {
    if tj_env::check_native_support() {
        println!("✓ Native toolchain available");
    } else {
        println!("Native toolchain unavailable; native solvers cannot be built");
    }
}
