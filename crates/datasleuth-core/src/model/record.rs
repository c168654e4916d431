/// Per-file records and the aggregated scan result.
///
/// A [`FileRecord`] is constructed once per classified file during a single
/// scan pass and never mutated after emission.  [`ScanResult`] groups the
/// records by category, preserving configuration order, and carries the
/// scan-wide running total.
use super::id::IdField;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Metadata emitted for every classified file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    /// Base file name, original casing.
    pub file_name: String,
    /// Rounded size in KB (see [`super::size::FILE_SIZE_UNIT`]).
    pub file_size: u64,
    /// Path relative to the scan root, `./`-prefixed.  Falls back to the
    /// bare file name when the path cannot be made relative.
    pub directory: String,
    /// Owning organization, taken from the configuration.
    pub organization: String,
    pub sample_id: IdField,
    pub patient_id: IdField,
}

/// One scan's output: per-category record lists plus the total size in KB.
///
/// Every configured category is present even when empty.  Record order
/// within a category follows traversal order, which is filesystem-dependent;
/// consumers may rely on it for display only.
///
/// Serializes as a JSON object mapping category name to record list, in
/// configuration order — the `files` member of the output document.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    buckets: Vec<(String, Vec<FileRecord>)>,
    /// Sum of every emitted record's `file_size`.
    pub total_size_kb: u64,
}

impl ScanResult {
    /// Create a result with one empty bucket per configured category.
    pub fn with_categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
            total_size_kb: 0,
        }
    }

    /// Append a record to its category and fold its size into the total.
    ///
    /// This is the scan's single merge point: all aggregation funnels
    /// through here.
    pub fn push(&mut self, category: &str, record: FileRecord) {
        self.total_size_kb += record.file_size;
        match self.buckets.iter_mut().find(|(name, _)| name == category) {
            Some((_, records)) => records.push(record),
            None => self.buckets.push((category.to_string(), vec![record])),
        }
    }

    /// Records for one category, if that category was configured.
    pub fn category(&self, name: &str) -> Option<&[FileRecord]> {
        self.buckets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, records)| records.as_slice())
    }

    /// Category buckets in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileRecord])> {
        self.buckets
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Total number of emitted records across all categories.
    pub fn file_count(&self) -> usize {
        self.buckets.iter().map(|(_, records)| records.len()).sum()
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, records) in &self.buckets {
            map.serialize_entry(name, records)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            file_name: name.to_string(),
            file_size: size,
            directory: format!("./{name}"),
            organization: "WEHI".to_string(),
            sample_id: IdField::Single("S1".to_string()),
            patient_id: IdField::Single(String::new()),
        }
    }

    #[test]
    fn configured_categories_present_when_empty() {
        let result = ScanResult::with_categories(["raw", "processed", "summarised"]);
        assert_eq!(result.category("raw"), Some(&[][..]));
        assert_eq!(result.category("summarised"), Some(&[][..]));
        assert_eq!(result.category("unknown"), None);
    }

    #[test]
    fn push_accumulates_total() {
        let mut result = ScanResult::with_categories(["raw", "processed"]);
        result.push("raw", record("a.fastq", 3));
        result.push("processed", record("b.bam", 7));
        assert_eq!(result.total_size_kb, 10);
        assert_eq!(result.file_count(), 2);
        assert_eq!(result.category("raw").unwrap().len(), 1);
    }

    /// The `files` object must list categories in configuration order, with
    /// empty categories included.
    #[test]
    fn serializes_in_configuration_order() {
        let mut result = ScanResult::with_categories(["raw", "processed", "summarised"]);
        result.push("summarised", record("t.csv", 1));

        let json = serde_json::to_string(&result).unwrap();
        let raw_pos = json.find("\"raw\"").unwrap();
        let processed_pos = json.find("\"processed\"").unwrap();
        let summarised_pos = json.find("\"summarised\"").unwrap();
        assert!(raw_pos < processed_pos && processed_pos < summarised_pos);
        assert!(json.contains("\"raw\":[]"));
    }

    #[test]
    fn record_serializes_expected_keys() {
        let value = serde_json::to_value(record("a.fastq", 3)).unwrap();
        assert_eq!(value["file_name"], "a.fastq");
        assert_eq!(value["file_size"], 3);
        assert_eq!(value["directory"], "./a.fastq");
        assert_eq!(value["organization"], "WEHI");
        assert_eq!(value["sample_id"], "S1");
        assert_eq!(value["patient_id"], "");
    }
}
