//! Sample resolver.
//!
//! For one donor/condition group: pick the matching rows of the sample sheet,
//! pair low and high quartile samples, locate their FASTQs under
//! `<base_dir>/<donor>/<condition>/` and run `mageck count` then `mageck test`
//! in a `rep<N>` directory per pair.
//!
//! Group- and replicate-level problems (no rows, unequal quartile sizes,
//! missing FASTQs) are printed and skipped. A failing MAGeCK step aborts the
//! run unless `keep_going` is set.

pub mod fastq;
pub mod pairing;

pub use fastq::{find_fastq, FastqLookup};
pub use pairing::{pair_replicates, GroupQuery, Pairing, ReplicatePair};

use crate::config::ScreenConfig;
use crate::error::{ErrorCode, Result, ScreenError};
use crate::mageck::MageckCommands;
use crate::metadata::{SampleId, SampleTable};
use crate::subprocess::{MageckStep, ProcessCommand, StepOutcome, SubprocessManager};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStatus {
    NoMatch,
    Mismatched { low: usize, high: usize },
    Processed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFastq { low: SampleId, high: SampleId },
    AmbiguousFastq { sample: SampleId, candidates: Vec<PathBuf> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicateOutcome {
    Completed { workdir: PathBuf },
    Skipped(SkipReason),
    Failed { step: MageckStep, exit_code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateReport {
    pub name: String,
    pub outcome: ReplicateOutcome,
}

/// What happened to one donor/condition group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub query: GroupQuery,
    pub status: GroupStatus,
    pub replicates: Vec<ReplicateReport>,
}

impl GroupReport {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, ReplicateOutcome::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ReplicateOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ReplicateOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ReplicateOutcome) -> bool) -> usize {
        self.replicates.iter().filter(|r| pred(&r.outcome)).count()
    }
}

pub struct SampleResolver {
    config: ScreenConfig,
    subprocess: SubprocessManager,
    commands: MageckCommands,
    keep_going: bool,
}

impl SampleResolver {
    pub fn new(config: ScreenConfig, subprocess: SubprocessManager) -> Self {
        let commands =
            MageckCommands::new(config.tool.program.clone()).with_timeout(config.tool.timeout());
        Self {
            config,
            subprocess,
            commands,
            keep_going: false,
        }
    }

    /// Continue with the next replicate when a MAGeCK step fails
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Load the configured sample sheet and process one group.
    pub async fn run(&self, donor: &str, condition: &str) -> Result<GroupReport> {
        let table = SampleTable::from_path(&self.config.sample_info_path(), b',')?;
        self.run_with_table(&table, donor, condition).await
    }

    pub async fn run_with_table(
        &self,
        table: &SampleTable,
        donor: &str,
        condition: &str,
    ) -> Result<GroupReport> {
        let query = GroupQuery::new(donor, condition);
        let quartiles = &self.config.quartiles;

        let pairs = match pair_replicates(table, &query, quartiles)? {
            Pairing::NoMatch => {
                println!("No matching samples for {} {}", query.donor, query.condition);
                return Ok(GroupReport {
                    query,
                    status: GroupStatus::NoMatch,
                    replicates: Vec::new(),
                });
            }
            Pairing::Mismatched { low, high } => {
                println!(
                    "Mismatched number of {} and {} samples for {} {}",
                    quartiles.low, quartiles.high, query.donor, query.condition
                );
                tracing::debug!("{} {} vs {} {}", low, quartiles.low, high, quartiles.high);
                return Ok(GroupReport {
                    query,
                    status: GroupStatus::Mismatched { low, high },
                    replicates: Vec::new(),
                });
            }
            Pairing::Pairs(pairs) => pairs,
        };

        let library = self.config.library_path();
        if !library.exists() {
            tracing::warn!("Library file {} does not exist", library.display());
        }

        let group_dir = self
            .config
            .base_dir
            .join(&query.donor)
            .join(&query.condition);

        let mut replicates = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let outcome = self
                .run_replicate(&query, pair, &group_dir, &library)
                .await?;
            replicates.push(ReplicateReport {
                name: pair.name(),
                outcome,
            });
        }

        Ok(GroupReport {
            query,
            status: GroupStatus::Processed,
            replicates,
        })
    }

    async fn run_replicate(
        &self,
        query: &GroupQuery,
        pair: &ReplicatePair,
        group_dir: &Path,
        library: &Path,
    ) -> Result<ReplicateOutcome> {
        let rep = pair.name();
        let tag = format!("[{} {} {}]", query.donor, query.condition, rep);

        let (low_fastq, high_fastq) = match (
            find_fastq(group_dir, &pair.low)?,
            find_fastq(group_dir, &pair.high)?,
        ) {
            (FastqLookup::Found(low), FastqLookup::Found(high)) => (low, high),
            (FastqLookup::Ambiguous(candidates), _) => {
                return Ok(self.skip_ambiguous(query, &rep, &pair.low, candidates));
            }
            (_, FastqLookup::Ambiguous(candidates)) => {
                return Ok(self.skip_ambiguous(query, &rep, &pair.high, candidates));
            }
            _ => {
                println!(
                    "Missing FASTQ for {} {} {}: {} or {}",
                    query.donor, query.condition, rep, pair.low, pair.high
                );
                return Ok(ReplicateOutcome::Skipped(SkipReason::MissingFastq {
                    low: pair.low.clone(),
                    high: pair.high.clone(),
                }));
            }
        };

        let workdir = group_dir.join(&rep);
        std::fs::create_dir_all(&workdir).map_err(|e| {
            ScreenError::io_with_code(
                ErrorCode::IO_CREATE_DIR,
                "Cannot create replicate directory",
                Some(workdir.clone()),
            )
            .with_source(e)
        })?;

        let prefix = format!("mageck_{}_{}_{}", query.donor, query.condition, rep);

        println!("{} Running MAGeCK count...", tag);
        let count = self
            .commands
            .replicate_count(library, &low_fastq, &high_fastq, &prefix, &workdir);
        if let Some(failed) = self.run_step(&tag, MageckStep::Count, count).await? {
            return Ok(failed);
        }

        println!("{} Running MAGeCK test...", tag);
        let test = self.commands.replicate_test(&prefix, &workdir);
        if let Some(failed) = self.run_step(&tag, MageckStep::Test, test).await? {
            return Ok(failed);
        }

        println!("{} Analysis complete.", tag);
        Ok(ReplicateOutcome::Completed { workdir })
    }

    /// Run one step. `Ok(Some(_))` is a tolerated failure under `keep_going`.
    async fn run_step(
        &self,
        tag: &str,
        step: MageckStep,
        command: ProcessCommand,
    ) -> Result<Option<ReplicateOutcome>> {
        let display = command.display();
        match self.subprocess.mageck().run_step(step, command).await? {
            StepOutcome::Succeeded { .. } => Ok(None),
            StepOutcome::Failed { exit_code, stderr } => {
                if self.keep_going {
                    println!(
                        "{} MAGeCK {} failed (exit code {}); continuing",
                        tag,
                        step,
                        exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
                    );
                    if !stderr.trim().is_empty() {
                        tracing::warn!("mageck {} stderr:\n{}", step, stderr.trim_end());
                    }
                    return Ok(Some(ReplicateOutcome::Failed { step, exit_code }));
                }
                Err(ScreenError::execution_with_code(
                    ErrorCode::EXEC_SUBPROCESS_FAILED,
                    format!("{} MAGeCK {} failed", tag, step),
                    Some(display),
                )
                .with_process_output(exit_code, &stderr))
            }
        }
    }

    fn skip_ambiguous(
        &self,
        query: &GroupQuery,
        rep: &str,
        sample: &SampleId,
        candidates: Vec<PathBuf>,
    ) -> ReplicateOutcome {
        let names: Vec<String> = candidates
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        println!(
            "Ambiguous FASTQ for {} {} {}: sample {} matches {}",
            query.donor,
            query.condition,
            rep,
            sample,
            names.join(", ")
        );
        ReplicateOutcome::Skipped(SkipReason::AmbiguousFastq {
            sample: sample.clone(),
            candidates,
        })
    }
}
