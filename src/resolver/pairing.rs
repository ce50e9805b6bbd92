use crate::config::QuartileConfig;
use crate::error::Result;
use crate::metadata::{normalize_key, SampleId, SampleTable};

pub const DONOR_COLUMN: &str = "donor";
pub const CONDITION_COLUMN: &str = "condition";
pub const QUARTILE_COLUMN: &str = "quartile";
pub const SAMPLE_COLUMN: &str = "sample";

/// A donor/condition pair as typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    pub donor: String,
    pub condition: String,
}

impl GroupQuery {
    pub fn new(donor: &str, condition: &str) -> Self {
        Self {
            donor: donor.trim().to_string(),
            condition: condition.trim().to_string(),
        }
    }

    fn matches(&self, donor: &str, condition: &str) -> bool {
        normalize_key(&self.donor) == normalize_key(donor)
            && normalize_key(&self.condition) == normalize_key(condition)
    }
}

/// One low/high sample pair, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicatePair {
    pub index: usize,
    pub low: SampleId,
    pub high: SampleId,
}

impl ReplicatePair {
    pub fn name(&self) -> String {
        format!("rep{}", self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
    /// No row matched the donor/condition
    NoMatch,
    /// Low and high sides differ in size; nothing is paired
    Mismatched { low: usize, high: usize },
    Pairs(Vec<ReplicatePair>),
}

/// Select the rows of `table` for `query` and pair low with high samples by position.
pub fn pair_replicates(
    table: &SampleTable,
    query: &GroupQuery,
    quartiles: &QuartileConfig,
) -> Result<Pairing> {
    let columns = table.resolve_columns(&[
        DONOR_COLUMN,
        CONDITION_COLUMN,
        QUARTILE_COLUMN,
        SAMPLE_COLUMN,
    ])?;

    let mut matched = 0;
    let mut low = Vec::new();
    let mut high = Vec::new();

    for record in table.records() {
        if !query.matches(
            columns.get(record, DONOR_COLUMN),
            columns.get(record, CONDITION_COLUMN),
        ) {
            continue;
        }
        matched += 1;

        let quartile = columns.get(record, QUARTILE_COLUMN);
        let sample = SampleId::parse(columns.get(record, SAMPLE_COLUMN));
        if quartile.eq_ignore_ascii_case(quartiles.low.trim()) {
            low.push(sample);
        } else if quartile.eq_ignore_ascii_case(quartiles.high.trim()) {
            high.push(sample);
        } else {
            tracing::debug!("Ignoring sample {} in quartile '{}'", sample, quartile);
        }
    }

    if matched == 0 {
        return Ok(Pairing::NoMatch);
    }

    tracing::debug!(
        "{} {}: {} rows, {} {} / {} {}",
        query.donor,
        query.condition,
        matched,
        low.len(),
        quartiles.low,
        high.len(),
        quartiles.high
    );

    if low.len() != high.len() {
        return Ok(Pairing::Mismatched {
            low: low.len(),
            high: high.len(),
        });
    }

    low.sort();
    high.sort();

    let pairs = low
        .into_iter()
        .zip(high)
        .enumerate()
        .map(|(i, (low, high))| ReplicatePair {
            index: i + 1,
            low,
            high,
        })
        .collect();

    Ok(Pairing::Pairs(pairs))
}
