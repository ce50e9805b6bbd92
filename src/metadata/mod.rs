//! Tabular sample metadata.
//!
//! Both the sample resolver and the design builder read delimited tables with a
//! header row whose column names are matched case-insensitively.

use crate::error::{ErrorCode, Result, ScreenError};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

mod sample_id;

pub use sample_id::SampleId;

/// Lowercase `value` and drop all whitespace, so "Donor A" and " donora" compare equal
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An in-memory delimited table
#[derive(Debug, Clone)]
pub struct SampleTable {
    source: Option<PathBuf>,
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl SampleTable {
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            ScreenError::input_with_code(
                ErrorCode::INPUT_NOT_FOUND,
                "Cannot open table",
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })?;
        Self::from_reader(file, delimiter, Some(path.to_path_buf()))
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8, source: Option<PathBuf>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| table_error(&source, "Cannot read header row", e))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                table_error(&source, format!("Malformed data row {}", index + 1), e)
            })?;
            records.push(record);
        }

        tracing::debug!(
            "Read {} rows with columns [{}] from {}",
            records.len(),
            headers.join(", "),
            source
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string())
        );

        Ok(Self {
            source,
            headers,
            records,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &csv::StringRecord> {
        self.records.iter()
    }

    /// Match each logical column name against the headers, ignoring case.
    ///
    /// The first matching header wins. Every missing column is reported in a
    /// single error.
    pub fn resolve_columns(&self, required: &[&str]) -> Result<ColumnMap> {
        let mut indices = HashMap::new();
        let mut missing = Vec::new();

        for &logical in required {
            let found = self
                .headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(logical));
            match found {
                Some(index) => {
                    tracing::trace!("Column '{}' -> '{}'", logical, self.headers[index]);
                    indices.insert(logical.to_string(), index);
                }
                None => missing.push(logical),
            }
        }

        if !missing.is_empty() {
            return Err(ScreenError::input_with_code(
                ErrorCode::INPUT_MISSING_COLUMNS,
                format!(
                    "table must include columns [{}]; missing [{}]; saw [{}]",
                    required.join(", "),
                    missing.join(", "),
                    self.headers.join(", ")
                ),
                self.source.clone(),
            ));
        }

        Ok(ColumnMap { indices })
    }
}

fn table_error(
    source: &Option<PathBuf>,
    message: impl Into<String>,
    err: csv::Error,
) -> ScreenError {
    ScreenError::input_with_code(ErrorCode::INPUT_MALFORMED_ROW, message, source.clone())
        .with_source(err)
}

/// Logical column name to header position
#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
}

impl ColumnMap {
    /// Cell of `record` under the logical column, trimmed. Unknown columns read as empty.
    pub fn get<'r>(&self, record: &'r csv::StringRecord, logical: &str) -> &'r str {
        self.indices
            .get(logical)
            .and_then(|&index| record.get(index))
            .map(str::trim)
            .unwrap_or("")
    }
}

impl fmt::Display for SampleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(path) => write!(f, "{} ({} rows)", path.display(), self.records.len()),
            None => write!(f, "<memory> ({} rows)", self.records.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(data: &str) -> SampleTable {
        SampleTable::from_reader(data.as_bytes(), b',', None).unwrap()
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Donor A"), "donora");
        assert_eq!(normalize_key("  don orA "), "donora");
        assert_eq!(normalize_key("CD4\tstim"), "cd4stim");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_resolve_mixed_case_headers() {
        let t = table("SAMPLE_ID,Donor,BIN,R1,R2\ns1,1,2,a.fq,b.fq\n");
        let cols = t
            .resolve_columns(&["sample_id", "donor", "bin", "r1", "r2"])
            .unwrap();
        let record = t.records().next().unwrap();
        assert_eq!(cols.get(record, "sample_id"), "s1");
        assert_eq!(cols.get(record, "bin"), "2");
        assert_eq!(cols.get(record, "r2"), "b.fq");
    }

    #[test]
    fn test_resolve_reports_all_missing() {
        let t = table("sample_id,Donor,R1\ns1,1,a.fq\n");
        let err = t
            .resolve_columns(&["sample_id", "donor", "bin", "r1", "r2"])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::INPUT_MISSING_COLUMNS);
        let message = err.to_string();
        assert!(message.contains("missing [bin, r2]"), "{message}");
        assert!(message.contains("saw [sample_id, Donor, R1]"), "{message}");
    }

    #[test]
    fn test_header_whitespace_ignored() {
        let t = table(" Donor ,Condition\nA,B\n");
        assert!(t.resolve_columns(&["donor", "condition"]).is_ok());
    }

    #[test]
    fn test_ragged_row_is_error() {
        let result = SampleTable::from_reader("a,b\n1,2,3\n".as_bytes(), b',', None);
        let err = result.unwrap_err();
        assert_eq!(err.code(), ErrorCode::INPUT_MALFORMED_ROW);
    }

    #[test]
    fn test_tab_delimited() {
        let t = SampleTable::from_reader("x\ty\n1\t2\n3\t4\n".as_bytes(), b'\t', None).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.headers(), ["x", "y"]);
    }

    #[test]
    fn test_missing_file() {
        let err = SampleTable::from_path(Path::new("/nonexistent/sample_info.csv"), b',')
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::INPUT_NOT_FOUND);
    }
}
