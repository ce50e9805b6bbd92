//! CLI command handlers

pub mod args;

pub use args::{Cli, Commands};

use crate::config::ConfigLoader;
use crate::design::{DesignBuilder, DesignOptions};
use crate::mageck::MageckCommands;
use crate::resolver::{GroupStatus, SampleResolver};
use crate::subprocess::SubprocessManager;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Log filter for a `-v` count
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Execute a parsed command line
pub async fn execute_command(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;

    match cli.command {
        Commands::Resolve {
            donor,
            condition,
            base_dir,
            keep_going,
        } => run_resolve(cli.config.as_deref(), &cwd, &donor, &condition, base_dir, keep_going).await,
        Commands::Design {
            sample_info,
            library,
            cspa,
            fastq_root,
            outdir,
            threads,
            dry_run,
            execute,
        } => {
            let options = DesignOptions {
                sample_info,
                library,
                cspa,
                fastq_root,
                outdir,
                threads,
                dry_run,
                execute,
            };
            run_design(cli.config.as_deref(), &cwd, options).await
        }
        Commands::Library { input, output } => {
            let written = crate::library::generate_library_file(&input, &output)?;
            println!("Wrote {} guides to {}", written, output.display());
            Ok(())
        }
    }
}

async fn run_resolve(
    config_path: Option<&Path>,
    cwd: &Path,
    donor: &str,
    condition: &str,
    base_dir: Option<PathBuf>,
    keep_going: bool,
) -> Result<()> {
    let config = ConfigLoader::new()
        .load_file(config_path, cwd)
        .await?
        .merge_env_vars()
        .with_base_dir(base_dir)
        .build()?;

    tracing::debug!("Resolver configuration: {:?}", config);

    let resolver =
        SampleResolver::new(config, SubprocessManager::production()).keep_going(keep_going);
    let report = resolver.run(donor, condition).await?;

    if report.status == GroupStatus::Processed {
        tracing::info!(
            "{} {}: {} replicate(s) completed, {} skipped, {} failed",
            report.query.donor,
            report.query.condition,
            report.completed(),
            report.skipped(),
            report.failed()
        );
    }
    Ok(())
}

async fn run_design(config_path: Option<&Path>, cwd: &Path, options: DesignOptions) -> Result<()> {
    let config = ConfigLoader::new()
        .load_file(config_path, cwd)
        .await?
        .merge_env_vars()
        .build()?;

    let commands =
        MageckCommands::new(config.tool.program.clone()).with_timeout(config.tool.timeout());
    let builder = DesignBuilder::new(commands, SubprocessManager::production());
    builder.run(&options).await?;
    Ok(())
}
