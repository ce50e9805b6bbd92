//! Convert a guide library table into MAGeCK's library format.
//!
//! The input is a tab-separated table with a header, e.g. the Brunello
//! library listing. The output is headerless: `sgRNA_<n>`, sequence, gene.

use crate::error::{ErrorCode, Result, ScreenError};
use crate::metadata::SampleTable;
use std::io::Write;
use std::path::Path;

pub const SEQUENCE_COLUMN: &str = "sgRNA Target Sequence";
pub const GENE_COLUMN: &str = "Target Gene Symbol";

/// Synthetic guide identifier for the 1-based row `n`
pub fn guide_id(n: usize) -> String {
    format!("sgRNA_{}", n)
}

/// Write the MAGeCK library rows for `table` to `out`, returning the row count.
pub fn write_library<W: Write>(table: &SampleTable, out: W) -> Result<usize> {
    let columns = table.resolve_columns(&[SEQUENCE_COLUMN, GENE_COLUMN])?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(out);

    let mut written = 0;
    for record in table.records() {
        written += 1;
        writer
            .write_record([
                guide_id(written).as_str(),
                columns.get(record, SEQUENCE_COLUMN),
                columns.get(record, GENE_COLUMN),
            ])
            .map_err(write_error)?;
    }

    writer.flush().map_err(|e| write_error(e.into()))?;
    Ok(written)
}

/// Read the library table at `input` and write MAGeCK's format to `output`.
pub fn generate_library_file(input: &Path, output: &Path) -> Result<usize> {
    let table = SampleTable::from_path(input, b'\t')?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ScreenError::io_with_code(
                ErrorCode::IO_CREATE_DIR,
                "Cannot create library output directory",
                Some(parent.to_path_buf()),
            )
            .with_source(e)
        })?;
    }

    let file = std::fs::File::create(output).map_err(|e| {
        ScreenError::io_with_code(
            ErrorCode::IO_WRITE_FAILED,
            "Cannot create library file",
            Some(output.to_path_buf()),
        )
        .with_source(e)
    })?;

    let written = write_library(&table, std::io::BufWriter::new(file))
        .map_err(|e| e.with_context(output.display()))?;

    tracing::info!(
        "Wrote {} guides from {} to {}",
        written,
        table,
        output.display()
    );
    Ok(written)
}

fn write_error(err: csv::Error) -> ScreenError {
    ScreenError::io_with_code(ErrorCode::IO_WRITE_FAILED, "Failed to write library row", None)
        .with_source(err)
}
