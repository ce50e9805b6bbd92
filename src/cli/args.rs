//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drive MAGeCK count/test across CRISPR knockout screen sample groups
#[derive(Parser, Debug)]
#[command(name = "koscreen")]
#[command(about = "koscreen - run MAGeCK across donor/condition/replicate sample groups", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./koscreen.toml when present)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pair Q1/Q4 samples of one donor and condition and run MAGeCK count + test per replicate
    ///
    /// FASTQs are looked up in `<BASE_DIR>/<DONOR>/<CONDITION>/` by the prefix
    /// `<sample>_S`, and each sample must match exactly one file there. Keep
    /// only the R1 (or single-end) FASTQ in that folder: an R1/R2 pair makes
    /// the sample ambiguous and its replicate is skipped.
    #[command(name = "resolve")]
    Resolve {
        /// Donor name (case and spaces ignored when matching)
        donor: String,

        /// Condition name (case and spaces ignored when matching)
        condition: String,

        /// Base directory holding <donor>/<condition> FASTQ folders
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,

        /// Continue with the next replicate when a MAGeCK step fails
        #[arg(long)]
        keep_going: bool,
    },

    /// Write a design.tsv manifest from a sample sheet and print the MAGeCK commands
    #[command(name = "design")]
    Design {
        /// CSV with sample metadata (sample_id, donor, bin, r1, r2)
        #[arg(long, value_name = "FILE")]
        sample_info: PathBuf,

        /// sgRNA library file for MAGeCK (e.g. Brunello)
        #[arg(long, value_name = "FILE")]
        library: PathBuf,

        /// Surface protein annotation CSV, used downstream
        #[arg(long, value_name = "FILE")]
        cspa: Option<PathBuf>,

        /// Root folder for FASTQs, prefixed to relative r1/r2 paths
        #[arg(long, value_name = "DIR", default_value = ".")]
        fastq_root: PathBuf,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        outdir: PathBuf,

        /// Worker threads (accepted for compatibility; unused)
        #[arg(long, default_value = "4")]
        threads: usize,

        /// Print commands only
        #[arg(long)]
        dry_run: bool,

        /// Run the printed commands after writing the manifest
        #[arg(long, conflicts_with = "dry_run")]
        execute: bool,
    },

    /// Convert a guide library table into MAGeCK's headerless library format
    #[command(name = "library")]
    Library {
        /// Tab-separated library with 'sgRNA Target Sequence' and 'Target Gene Symbol' columns
        input: PathBuf,

        /// Output library file
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_requires_two_positionals() {
        let result = Cli::try_parse_from(["koscreen", "resolve", "Donor A"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["koscreen", "resolve", "Donor A", "CD4 Stim"]).unwrap();
        match cli.command {
            Commands::Resolve {
                donor, condition, ..
            } => {
                assert_eq!(donor, "Donor A");
                assert_eq!(condition, "CD4 Stim");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_design_defaults() {
        let cli = Cli::try_parse_from([
            "koscreen",
            "design",
            "--sample-info",
            "s.csv",
            "--library",
            "lib.txt",
            "--outdir",
            "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Design {
                fastq_root,
                threads,
                dry_run,
                execute,
                cspa,
                ..
            } => {
                assert_eq!(fastq_root, PathBuf::from("."));
                assert_eq!(threads, 4);
                assert!(!dry_run);
                assert!(!execute);
                assert!(cspa.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_design_requires_outdir() {
        let result = Cli::try_parse_from([
            "koscreen",
            "design",
            "--sample-info",
            "s.csv",
            "--library",
            "lib.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_conflicts_with_dry_run() {
        let result = Cli::try_parse_from([
            "koscreen",
            "design",
            "--sample-info",
            "s.csv",
            "--library",
            "lib.txt",
            "--outdir",
            "out",
            "--dry-run",
            "--execute",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "koscreen", "library", "in.tsv", "out.txt", "-vv", "-c", "k.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("k.toml")));
    }
}
