use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

use cmor_fixes::config::Config;
use cmor_fixes::constants::CMIP5;
use cmor_fixes::{logging, metrics, paths};
use cmor_fixes::{Fix, FixIdentity, FixPipeline, FixResolver, JsonCubeStore};

#[derive(Parser)]
#[command(name = "cmor_fixes")]
#[command(about = "Resolve and apply per-model fixes to climate model output")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $CMOR_FIXES_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fix chain for a project, model and variable
    Resolve {
        #[arg(long, default_value = CMIP5)]
        project: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        variable: String,
    },
    /// List the models (and their fixed variables) known to the catalog
    List {
        /// Only list this project
        #[arg(long)]
        project: Option<String>,
    },
    /// Apply the fix chain to a JSON cube file
    Fix {
        #[arg(long, default_value = CMIP5)]
        project: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        variable: String,
        /// Cube document to fix
        #[arg(long)]
        input: PathBuf,
        /// Where to save the fixed cube (default: next to the input with a random token)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    let _guard = logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    if config.metrics.enabled || cli.print_metrics {
        metrics::init_metrics();
    }

    let resolver = FixResolver::default();
    match cli.command {
        Commands::Resolve {
            project,
            model,
            variable,
        } => {
            let identity = FixIdentity::new(project, model, variable);
            let chain = resolver.resolve(&identity);
            if chain.is_empty() {
                println!("No fixes for {}", identity);
            } else {
                println!("Fixes for {}:", identity);
                for (position, fix) in chain.iter().enumerate() {
                    println!("   {}. {}", position + 1, fix.fix_name());
                }
            }
        }
        Commands::List { project } => {
            let catalog = resolver.catalog();
            let projects = match project.as_deref() {
                Some(project) => vec![project],
                None => catalog.projects(),
            };
            for project in projects {
                println!("{}:", project);
                for model in catalog.models(project) {
                    let generic = if catalog.has_generic(project, model) {
                        " [allvars]"
                    } else {
                        ""
                    };
                    println!(
                        "   {}{}: {}",
                        model,
                        generic,
                        catalog.variables(project, model).join(", ")
                    );
                }
            }
        }
        Commands::Fix {
            project,
            model,
            variable,
            input,
            output,
        } => {
            let identity = FixIdentity::new(project, model, variable);
            let remove_fixed_files = config.pipeline.remove_partial_files;
            let pipeline = FixPipeline::new(resolver, config.pipeline);
            let store = JsonCubeStore;
            let output = output.unwrap_or_else(|| paths::fixed_filepath(&input));
            let outcome = pipeline
                .apply_and_save(&identity, &input, &store, &store, &output)
                .with_context(|| format!("Failed to fix {} for {}", input.display(), identity))?;

            if remove_fixed_files && outcome.path != input && outcome.path != output {
                fs::remove_file(&outcome.path).with_context(|| {
                    format!("Failed to remove fixed file {}", outcome.path.display())
                })?;
                debug!("Removed fixed file {}", outcome.path.display());
            }

            info!("Applied {} fix(es) for {}", outcome.report.fixes.len(), identity);
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
    }

    if cli.print_metrics {
        match metrics::render() {
            Some(rendered) => eprintln!("{}", rendered),
            None => eprintln!("Metrics recorder is not installed"),
        }
    }
    Ok(())
}
