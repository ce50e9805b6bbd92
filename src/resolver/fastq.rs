use crate::error::{ErrorCode, Result, ScreenError};
use crate::metadata::SampleId;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastqLookup {
    Found(PathBuf),
    Missing,
    /// More than one file carries the sample's prefix
    Ambiguous(Vec<PathBuf>),
}

/// Find the FASTQ for `sample` directly inside `dir`.
///
/// Files are matched on the sequencer prefix `<sample>_S`, so sample `1` does
/// not pick up `12_S3_...`. A missing directory is treated as no match.
pub fn find_fastq(dir: &Path, sample: &SampleId) -> Result<FastqLookup> {
    if !dir.is_dir() {
        tracing::debug!("FASTQ directory {} does not exist", dir.display());
        return Ok(FastqLookup::Missing);
    }

    let prefix = sample.fastq_prefix();
    let mut candidates = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            ScreenError::io_with_code(
                ErrorCode::IO_READ_DIR,
                "Cannot list FASTQ directory",
                Some(dir.to_path_buf()),
            )
            .with_source(e)
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            candidates.push(entry.into_path());
        }
    }

    Ok(match candidates.len() {
        0 => FastqLookup::Missing,
        1 => FastqLookup::Found(candidates.remove(0)),
        _ => FastqLookup::Ambiguous(candidates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "@r\nACGT\n+\nIIII\n").unwrap();
    }

    #[test]
    fn test_found_unique_prefix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "1_S1_R1_001.fastq.gz");
        touch(dir.path(), "12_S3_R1_001.fastq.gz");

        let lookup = find_fastq(dir.path(), &SampleId::parse("1")).unwrap();
        assert_eq!(
            lookup,
            FastqLookup::Found(dir.path().join("1_S1_R1_001.fastq.gz"))
        );
    }

    #[test]
    fn test_missing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "4_S4_R1_001.fastq.gz");
        let lookup = find_fastq(dir.path(), &SampleId::parse("1")).unwrap();
        assert_eq!(lookup, FastqLookup::Missing);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let lookup = find_fastq(&dir.path().join("Donor A"), &SampleId::parse("1")).unwrap();
        assert_eq!(lookup, FastqLookup::Missing);
    }

    #[test]
    fn test_ambiguous_lists_all_candidates_sorted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "7_S7_R2_001.fastq.gz");
        touch(dir.path(), "7_S7_R1_001.fastq.gz");

        let lookup = find_fastq(dir.path(), &SampleId::parse("7.0")).unwrap();
        assert_eq!(
            lookup,
            FastqLookup::Ambiguous(vec![
                dir.path().join("7_S7_R1_001.fastq.gz"),
                dir.path().join("7_S7_R2_001.fastq.gz"),
            ])
        );
    }

    #[test]
    fn test_directories_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("3_S3_old")).unwrap();
        touch(dir.path(), "3_S3_R1_001.fastq.gz");

        let lookup = find_fastq(dir.path(), &SampleId::parse("3")).unwrap();
        assert_eq!(
            lookup,
            FastqLookup::Found(dir.path().join("3_S3_R1_001.fastq.gz"))
        );
    }
}
