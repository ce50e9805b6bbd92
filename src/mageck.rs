//! MAGeCK command lines.
//!
//! Flag names follow MAGeCK's own CLI. The count step names its table
//! `<prefix>.count.txt`, which the test step reads back.

use crate::subprocess::{ProcessCommand, ProcessCommandBuilder};
use std::path::Path;
use std::time::Duration;

pub const CONTROL_LABEL: &str = "control";
pub const TREATMENT_LABEL: &str = "treatment";
pub const COUNT_TABLE_SUFFIX: &str = ".count.txt";
pub const TEST_SUFFIX: &str = "_test";

pub fn count_table_name(prefix: &str) -> String {
    format!("{}{}", prefix, COUNT_TABLE_SUFFIX)
}

/// Builds `count` and `test` invocations for a configured executable
#[derive(Debug, Clone)]
pub struct MageckCommands {
    program: String,
    timeout: Option<Duration>,
}

impl MageckCommands {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Per-invocation time limit; unlimited when `None`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// MAGeCK logs progress on stdout/stderr, so its output goes to the terminal.
    fn command(&self) -> ProcessCommandBuilder {
        ProcessCommandBuilder::new(&self.program)
            .timeout(self.timeout)
            .inherit_output()
    }

    /// Count a low/high FASTQ pair, labelled control/treatment, inside `workdir`.
    pub fn replicate_count(
        &self,
        library: &Path,
        low_fastq: &Path,
        high_fastq: &Path,
        prefix: &str,
        workdir: &Path,
    ) -> ProcessCommand {
        self.command()
            .arg("count")
            .arg("-l")
            .path_arg(library)
            .arg("--fastq")
            .path_arg(low_fastq)
            .path_arg(high_fastq)
            .arg("--sample-label")
            .arg(&format!("{},{}", CONTROL_LABEL, TREATMENT_LABEL))
            .arg("-n")
            .arg(prefix)
            .current_dir(workdir)
            .build()
    }

    /// RRA test of treatment against control on the count table named by `prefix`.
    pub fn replicate_test(&self, prefix: &str, workdir: &Path) -> ProcessCommand {
        self.command()
            .arg("test")
            .arg("-k")
            .arg(&count_table_name(prefix))
            .arg("-t")
            .arg(TREATMENT_LABEL)
            .arg("-c")
            .arg(CONTROL_LABEL)
            .arg("-n")
            .arg(&format!("{}{}", prefix, TEST_SUFFIX))
            .current_dir(workdir)
            .build()
    }

    /// Count command pointing MAGeCK at a design manifest.
    ///
    /// Not every MAGeCK release accepts a file for `--sample-label`/`--fastq`;
    /// this form is printed for the operator to adapt.
    pub fn design_count(&self, library: &Path, count_prefix: &Path, design: &Path) -> ProcessCommand {
        self.command()
            .arg("count")
            .arg("-l")
            .path_arg(library)
            .arg("-n")
            .path_arg(count_prefix)
            .arg("--sample-label")
            .path_arg(design)
            .arg("--fastq")
            .build()
    }

    /// Test command for the design count table, with placeholder group labels.
    pub fn design_test(&self, count_prefix: &Path, outdir: &Path) -> ProcessCommand {
        let count_table = format!("{}{}", count_prefix.display(), COUNT_TABLE_SUFFIX);
        self.command()
            .arg("test")
            .arg("-k")
            .arg(&count_table)
            .arg("-t")
            .arg(TREATMENT_LABEL)
            .arg("-c")
            .arg(CONTROL_LABEL)
            .arg("-n")
            .path_arg(&outdir.join("mageck_test"))
            .arg("--norm-method")
            .arg("control")
            .arg("--output-prefix")
            .arg("mageck_test")
            .build()
    }
}

impl Default for MageckCommands {
    fn default() -> Self {
        Self::new("mageck")
    }
}
