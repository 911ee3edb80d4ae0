use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use navigation_codegen::pipeline::{self, Context, GenerateOptions, RunSummary};

#[derive(Parser)]
#[command(name = "navgen")]
#[command(about = "Generate navigators, typed routes and a navigation graph", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every navigation source beneath a project directory
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Project directory to scan (defaults to current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Maximum number of sources compiled at once (defaults to available parallelism)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Write the .dot file but do not run Graphviz
    #[arg(long)]
    no_graph: bool,

    /// Never offer to create missing screen files
    #[arg(long)]
    no_scaffold: bool,
}

impl GenerateArgs {
    fn into_options(self) -> GenerateOptions {
        let defaults = GenerateOptions::default();
        GenerateOptions {
            root: self.root,
            jobs: self.jobs.unwrap_or(defaults.jobs).max(1),
            render_graph: !self.no_graph,
            scaffold: !self.no_scaffold && std::io::stdin().is_terminal(),
            file_names: defaults.file_names,
        }
    }
}

fn report(summary: &RunSummary) {
    for created in &summary.scaffolded {
        info!("Created {}", created.display());
    }
    info!(
        "{} source(s) compiled, {} failed",
        summary.compiled.len(),
        summary.failed.len() + summary.aborted
    );
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let ctx = Arc::new(Context::new(args.into_options()));

    let summary = tokio::select! {
        summary = pipeline::run(ctx) => summary,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, in-flight tools terminated");
            bail!("interrupted");
        }
    };

    report(&summary);
    if !summary.is_success() {
        bail!(
            "{} navigation source(s) failed",
            summary.failed.len() + summary.aborted
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Generate(args) => run_generate(args).await?,
    }

    Ok(())
}
