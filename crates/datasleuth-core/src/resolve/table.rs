/// Delimited-table introspection for summary files.
///
/// Summary tables come in two orientations: sample-per-row (the first
/// column is a row index of sample identifiers) and counts matrices
/// (samples are the header columns after the first).  Reads are strict —
/// ragged rows and non-UTF-8 content are errors — so callers can fall back
/// to filename-derived identifiers instead of emitting garbage.
use csv::ReaderBuilder;
use std::path::Path;

/// Recognized delimited-table formats, keyed on the final extension segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated.
    Csv,
    /// Tab-separated.
    Tsv,
    /// Tab-separated mutation annotation format; `#` comment lines skipped.
    Maf,
}

impl TableFormat {
    /// Detect a table format from the final extension segment of a name.
    pub fn from_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "maf" => Some(Self::Maf),
            _ => None,
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Tsv | Self::Maf => b'\t',
        }
    }

    fn comment(self) -> Option<u8> {
        match self {
            Self::Maf => Some(b'#'),
            Self::Csv | Self::Tsv => None,
        }
    }
}

/// Read the resolved sample identifiers from a summary table.
///
/// Standard orientation takes the first column of every data row, in row
/// order.  Counts orientation (tab-delimited tables only) takes every
/// header column after the first and reads no data rows.  An `Ok` empty
/// list means the table parsed but holds no sample labels; callers keep
/// their filename-derived default in that case.
pub fn read_table_samples(
    path: &Path,
    format: TableFormat,
    counts_format: bool,
) -> Result<Vec<String>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .comment(format.comment())
        .from_path(path)?;

    if counts_format && format == TableFormat::Tsv {
        let headers = reader.headers()?;
        return Ok(headers.iter().skip(1).map(str::to_string).collect());
    }

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(index_value) = record.get(0) {
            samples.push(index_value.to_string());
        }
    }
    Ok(samples)
}
