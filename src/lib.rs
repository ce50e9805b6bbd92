//! # koscreen
//!
//! Orchestrates MAGeCK count/test runs for pooled CRISPR knockout screens.
//!
//! ## Usage
//!
//! ```bash
//! koscreen resolve <DONOR> <CONDITION> [--base-dir DIR] [--keep-going]
//! koscreen design --sample-info FILE --library FILE --outdir DIR [--dry-run | --execute]
//! koscreen library <INPUT> <OUTPUT>
//! ```
//!
//! ## Modules
//!
//! - `cli` - Argument parsing and command dispatch
//! - `config` - Layered configuration (file, environment, command line)
//! - `design` - Sample sheet to `design.tsv` manifest and MAGeCK command preview
//! - `error` - Unified error type with stable error codes
//! - `library` - Guide library conversion into MAGeCK's headerless format
//! - `mageck` - MAGeCK command construction
//! - `metadata` - Sample sheet reading, column lookup and sample ids
//! - `resolver` - Q1/Q4 replicate pairing, FASTQ discovery and per-replicate runs
//! - `subprocess` - Process execution abstraction with a mock runner for tests
pub mod cli;
pub mod config;
pub mod design;
pub mod error;
pub mod library;
pub mod mageck;
pub mod metadata;
pub mod resolver;
pub mod subprocess;
