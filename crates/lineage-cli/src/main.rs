mod render;

use anyhow::{anyhow, Result};
use clap::{error::ErrorKind, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lineage_core::{Config, ErrorEnvelope, Lineage, OutputFormat};
use lineage_dbt::{model_name_from_path, LineageError, Manifest, NeighborhoodExtractor};

/// Reported for any command line that does not name exactly one model
const USAGE_ERROR: &str = "Model name required";

/// dbt-lineage - direct upstream and downstream neighbors of a dbt model
///
/// Reads target/manifest.json from the current directory and prints a single
/// JSON document to stdout. Failures are reported as {"error": "..."} with
/// exit status 1. `--help` and `--version` are answered by clap with plain
/// text and exit status 0; they never reach the model lookup.
#[derive(Debug, Parser)]
#[command(name = "dbt-lineage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model name to inspect (a model file path with --file)
    #[arg(value_name = "MODEL")]
    targets: Vec<String>,

    /// Treat MODEL as a .sql or .yml file path and query the model named after it
    #[arg(long)]
    file: bool,

    /// Path to config file (default: lineage.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: json or text (overrides config)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let parsed = Cli::try_parse();

    if let Err(err) = &parsed {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            err.exit();
        }
    }

    init_tracing(parsed.as_ref().map(|cli| cli.verbose).unwrap_or(false));

    let result = parsed
        .map_err(|err| {
            tracing::debug!(error = %err, "invalid command line");
            anyhow!(USAGE_ERROR)
        })
        .and_then(|cli| run(&cli));

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(error = ?err, "lineage query failed");
            println!("{}", ErrorEnvelope::new(err.to_string()).to_json());
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout only ever carries the result document
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Resolve the requested model and render its neighborhood
fn run(cli: &Cli) -> Result<String> {
    let [target] = cli.targets.as_slice() else {
        return Err(anyhow!(USAGE_ERROR));
    };

    let project_root = std::env::current_dir()?;
    let config = Config::discover(&project_root, cli.config.as_deref())?;

    let model_name = if cli.file {
        model_name_from_path(Path::new(target))
            .ok_or_else(|| LineageError::NotAModelFile(target.clone()))?
    } else {
        target.clone()
    };

    if !project_root.join("dbt_project.yml").exists() {
        tracing::warn!(
            root = %project_root.display(),
            "dbt_project.yml not found; the working directory may not be a dbt project"
        );
    }

    let manifest = Manifest::load(&project_root)?;

    tracing::debug!(
        nodes = manifest.nodes.len(),
        sources = manifest.sources.len(),
        "manifest loaded"
    );

    let lineage = NeighborhoodExtractor::new(&manifest)
        .with_diagnostics(config.diagnostics.clone())
        .lineage_for(&model_name)?;

    let format = cli.format.unwrap_or(config.output.format);
    render_output(&lineage, format, cli.pretty || config.output.pretty)
}

fn render_output(lineage: &Lineage, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(lineage.to_json(pretty)?),
        OutputFormat::Text => Ok(render::render_text(lineage)),
    }
}
