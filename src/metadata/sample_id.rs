use std::cmp::Ordering;
use std::fmt;

/// Sequencing sample identifier as written in the metadata `sample` column.
///
/// Spreadsheet exports often write integer ids as `12.0`; those are
/// canonicalized to `12` so they line up with `12_S3_...` FASTQ names.
/// Numeric ids order numerically and sort before non-numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleId(String);

impl SampleId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            return Self(n.to_string());
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
                return Self((f as u64).to_string());
            }
        }
        Self(trimmed.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Filename prefix produced by the sequencer for this sample
    pub fn fastq_prefix(&self) -> String {
        format!("{}_S", self.0)
    }
}

impl Ord for SampleId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SampleId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
