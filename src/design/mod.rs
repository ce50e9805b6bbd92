//! Design builder.
//!
//! Normalizes a generic sample sheet (`sample_id`, `donor`, `bin`, `r1`, `r2`,
//! any header case) into a `design.tsv` manifest and prints the MAGeCK
//! commands that would consume it. The commands are only run on explicit
//! request: the count form is not accepted by every MAGeCK release and the
//! test labels are placeholders.

use crate::error::{ErrorCode, Result, ScreenError};
use crate::mageck::MageckCommands;
use crate::metadata::SampleTable;
use crate::subprocess::{MageckStep, ProcessCommand, StepOutcome, SubprocessManager};
use std::path::{Path, PathBuf};

pub const SAMPLE_ID_COLUMN: &str = "sample_id";
pub const DONOR_COLUMN: &str = "donor";
pub const BIN_COLUMN: &str = "bin";
pub const R1_COLUMN: &str = "r1";
pub const R2_COLUMN: &str = "r2";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    SAMPLE_ID_COLUMN,
    DONOR_COLUMN,
    BIN_COLUMN,
    R1_COLUMN,
    R2_COLUMN,
];

pub const MANIFEST_FILE: &str = "design.tsv";
pub const MANIFEST_HEADER: [&str; 4] = ["sample", "fastq1", "fastq2", "label"];
pub const COUNT_PREFIX: &str = "mageck";

#[derive(Debug, Clone)]
pub struct DesignOptions {
    pub sample_info: PathBuf,
    pub library: PathBuf,
    pub cspa: Option<PathBuf>,
    pub fastq_root: PathBuf,
    pub outdir: PathBuf,
    pub threads: usize,
    pub dry_run: bool,
    pub execute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub sample: String,
    pub fastq1: PathBuf,
    pub fastq2: PathBuf,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct DesignReport {
    pub manifest: PathBuf,
    pub rows: usize,
    pub count: ProcessCommand,
    pub test: ProcessCommand,
    pub executed: bool,
}

/// Keep absolute references, join relative ones onto `root`
pub fn resolve_path(reference: &str, root: &Path) -> PathBuf {
    let path = Path::new(reference);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

pub fn design_label(donor: &str, bin: &str) -> String {
    format!("donor{}_bin{}", donor, bin)
}

/// Map every sample sheet row to a manifest row, preserving order.
///
/// Fails before producing anything if a required column is missing.
pub fn build_rows(table: &SampleTable, fastq_root: &Path) -> Result<Vec<ManifestRow>> {
    let columns = table.resolve_columns(&REQUIRED_COLUMNS)?;

    Ok(table
        .records()
        .map(|record| ManifestRow {
            sample: columns.get(record, SAMPLE_ID_COLUMN).to_string(),
            fastq1: resolve_path(columns.get(record, R1_COLUMN), fastq_root),
            fastq2: resolve_path(columns.get(record, R2_COLUMN), fastq_root),
            label: design_label(
                columns.get(record, DONOR_COLUMN),
                columns.get(record, BIN_COLUMN),
            ),
        })
        .collect())
}

/// Write the manifest, replacing any existing file at `path`.
pub fn write_manifest(rows: &[ManifestRow], path: &Path) -> Result<()> {
    let write_error = |e: csv::Error| {
        ScreenError::io_with_code(
            ErrorCode::IO_WRITE_FAILED,
            "Failed to write design manifest",
            Some(path.to_path_buf()),
        )
        .with_source(e)
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(write_error)?;

    writer.write_record(MANIFEST_HEADER).map_err(write_error)?;
    for row in rows {
        let fastq1 = row.fastq1.to_string_lossy();
        let fastq2 = row.fastq2.to_string_lossy();
        writer
            .write_record([row.sample.as_str(), &*fastq1, &*fastq2, row.label.as_str()])
            .map_err(write_error)?;
    }
    writer.flush().map_err(|e| write_error(e.into()))?;
    Ok(())
}

pub struct DesignBuilder {
    commands: MageckCommands,
    subprocess: SubprocessManager,
}

impl DesignBuilder {
    pub fn new(commands: MageckCommands, subprocess: SubprocessManager) -> Self {
        Self {
            commands,
            subprocess,
        }
    }

    pub async fn run(&self, options: &DesignOptions) -> Result<DesignReport> {
        tracing::debug!(
            "Design builder: {} threads requested (not used by count/test)",
            options.threads
        );

        let table = SampleTable::from_path(&options.sample_info, b',')?;
        let rows = build_rows(&table, &options.fastq_root)?;

        if let Some(cspa) = &options.cspa {
            if cspa.exists() {
                tracing::info!("Surface protein annotation: {}", cspa.display());
            } else {
                println!(
                    "[warn] Surface protein annotation {} not found",
                    cspa.display()
                );
            }
        }

        std::fs::create_dir_all(&options.outdir).map_err(|e| {
            ScreenError::io_with_code(
                ErrorCode::IO_CREATE_DIR,
                "Cannot create output directory",
                Some(options.outdir.clone()),
            )
            .with_source(e)
        })?;

        let manifest = options.outdir.join(MANIFEST_FILE);
        write_manifest(&rows, &manifest)?;
        tracing::info!("Wrote {} rows from {} to {}", rows.len(), table, manifest.display());

        let count_prefix = options.outdir.join(COUNT_PREFIX);
        let count = self
            .commands
            .design_count(&options.library, &count_prefix, &manifest);
        let test = self.commands.design_test(&count_prefix, &options.outdir);

        println!("[info] Prepared design at {}", manifest.display());
        println!("[info] Example commands (verify based on your design & labels):");
        println!("   {}", count.display());
        println!("   {}", test.display());

        let mut executed = false;
        if !options.dry_run {
            println!(
                "[warn] Executing MAGeCK requires installed `{}` and correct design semantics.",
                self.commands.program()
            );
            println!("[warn] Please verify treatment/control groups in `mageck test` for your experiment.");

            if options.execute {
                self.execute(MageckStep::Count, count.clone()).await?;
                self.execute(MageckStep::Test, test.clone()).await?;
                executed = true;
            } else {
                println!("[warn] Commands were not run; pass --execute to run them as shown.");
            }
        }

        Ok(DesignReport {
            manifest,
            rows: rows.len(),
            count,
            test,
            executed,
        })
    }

    async fn execute(&self, step: MageckStep, command: ProcessCommand) -> Result<()> {
        let display = command.display();
        println!("[cmd] {}", display);
        match self.subprocess.mageck().run_step(step, command).await? {
            StepOutcome::Succeeded { .. } => Ok(()),
            StepOutcome::Failed { exit_code, stderr } => Err(ScreenError::execution_with_code(
                ErrorCode::EXEC_SUBPROCESS_FAILED,
                format!("MAGeCK {} failed", step),
                Some(display),
            )
            .with_process_output(exit_code, &stderr)),
        }
    }
}
