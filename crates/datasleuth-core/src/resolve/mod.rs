/// Sample and patient identifier resolution.
///
/// Every classified file gets a default sample identifier derived from its
/// name and a patient identifier looked up in the merged sample→patient
/// mapping.  Summarised tabular files are additionally introspected: their
/// row index (or, for counts matrices, their header columns) replaces the
/// filename-derived sample.  When a table cannot be read the file silently
/// keeps its default — one unreadable summary file never aborts a scan.
pub mod table;

use crate::classify::{has_suffix_ci, ExtensionMap};
use crate::config::SUMMARISED_CATEGORY;
use crate::model::IdField;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use table::TableFormat;
use tracing::warn;

/// Resolved identifiers for one file, already collapsed to scalar-or-list
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIds {
    pub sample_id: IdField,
    pub patient_id: IdField,
}

/// Strip the longest configured extension (case-insensitively) from a file
/// name to obtain the default sample identifier.
///
/// The extension list is the union of all configured extensions, longest
/// first, so `sample1.fastq.gz` yields `sample1` rather than `sample1.fastq`.
/// When no configured extension matches, only the final `.ext` segment is
/// dropped.
pub fn extract_sample_id(file_name: &str, extensions: &ExtensionMap) -> String {
    for ext in extensions.extensions() {
        if has_suffix_ci(file_name, ext) {
            return file_name[..file_name.len() - ext.len()].to_string();
        }
    }
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// Derive the sample and patient identifiers for a classified file.
///
/// `patients` is the merged mapping (legacy entries already folded in).
/// The tabular-override path applies only to summarised files in a
/// recognized delimited format; everything else takes the filename-derived
/// default.
pub fn resolve_ids(
    path: &Path,
    file_name: &str,
    category: &str,
    extensions: &ExtensionMap,
    patients: &HashMap<String, String>,
    counts_format: bool,
) -> ResolvedIds {
    if category == SUMMARISED_CATEGORY {
        if let Some(format) = TableFormat::from_name(file_name) {
            match table::read_table_samples(path, format, counts_format) {
                Ok(samples) if !samples.is_empty() => {
                    return resolved_from_table(samples, patients);
                }
                // A table that parses but holds no sample labels keeps the
                // filename-derived default.
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        file = file_name,
                        error = %err,
                        "could not read summary table, keeping filename-derived sample"
                    );
                }
            }
        }
    }

    let sample = extract_sample_id(file_name, extensions);
    let patient = patients.get(&sample).cloned().unwrap_or_default();
    ResolvedIds {
        sample_id: IdField::Single(sample),
        patient_id: IdField::Single(patient),
    }
}

/// Map every table-resolved sample to its patient; unmapped samples are
/// dropped and the surviving patients come out sorted and deduplicated.
fn resolved_from_table(
    samples: Vec<String>,
    patients: &HashMap<String, String>,
) -> ResolvedIds {
    let patient_ids: BTreeSet<String> = samples
        .iter()
        .filter_map(|sample| patients.get(sample).cloned())
        .collect();
    ResolvedIds {
        sample_id: IdField::from_vec(samples),
        patient_id: IdField::from_vec(patient_ids.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Category;
    use std::fs;

    fn extensions() -> ExtensionMap {
        ExtensionMap::new(&[
            Category {
                name: "raw".to_string(),
                extensions: vec![".fastq".to_string(), ".fastq.gz".to_string()],
            },
            Category {
                name: SUMMARISED_CATEGORY.to_string(),
                extensions: vec![".csv".to_string(), ".tsv".to_string(), ".maf".to_string()],
            },
        ])
    }

    fn patients(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(s, p)| (s.to_string(), p.to_string()))
            .collect()
    }

    // ── extract_sample_id ────────────────────────────────────────────────

    #[test]
    fn strips_longest_configured_extension() {
        let exts = extensions();
        assert_eq!(extract_sample_id("sample1.fastq.gz", &exts), "sample1");
        assert_eq!(extract_sample_id("sample2.fastq", &exts), "sample2");
    }

    /// Stem casing is preserved; only the suffix match is case-insensitive.
    #[test]
    fn stripping_preserves_stem_casing() {
        let exts = extensions();
        assert_eq!(extract_sample_id("Sample1.FASTQ.GZ", &exts), "Sample1");
    }

    /// Unconfigured extensions fall back to dropping the final segment only.
    #[test]
    fn falls_back_to_final_segment() {
        let exts = extensions();
        assert_eq!(extract_sample_id("sample3.txt", &exts), "sample3");
        assert_eq!(extract_sample_id("a.b.txt", &exts), "a.b");
        assert_eq!(extract_sample_id("no_extension", &exts), "no_extension");
    }

    // ── default path ─────────────────────────────────────────────────────

    #[test]
    fn default_path_single_lookup() {
        let exts = extensions();
        let ids = resolve_ids(
            Path::new("/nonexistent/sample1.fastq"),
            "sample1.fastq",
            "raw",
            &exts,
            &patients(&[("sample1", "P1")]),
            false,
        );
        assert_eq!(ids.sample_id, IdField::Single("sample1".to_string()));
        assert_eq!(ids.patient_id, IdField::Single("P1".to_string()));
    }

    #[test]
    fn default_path_unmapped_sample_has_empty_patient() {
        let exts = extensions();
        let ids = resolve_ids(
            Path::new("/nonexistent/sample9.fastq"),
            "sample9.fastq",
            "raw",
            &exts,
            &patients(&[]),
            false,
        );
        assert_eq!(ids.sample_id, IdField::Single("sample9".to_string()));
        assert_eq!(ids.patient_id, IdField::Single(String::new()));
    }

    // ── tabular override ─────────────────────────────────────────────────

    /// Standard orientation: row-index values become the sample list; the
    /// single mapped patient collapses to a scalar.
    #[test]
    fn summary_rows_become_samples() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");
        fs::write(&path, "Sample,Value\nS1,10\nS2,20\n").unwrap();

        let ids = resolve_ids(
            &path,
            "summary.csv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[("S1", "P1")]),
            false,
        );
        assert_eq!(
            ids.sample_id,
            IdField::Many(vec!["S1".to_string(), "S2".to_string()])
        );
        assert_eq!(ids.patient_id, IdField::Single("P1".to_string()));
    }

    /// Patients from a multi-sample table come out sorted and deduplicated.
    #[test]
    fn table_patients_sorted_and_deduplicated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");
        fs::write(&path, "Sample,Value\nS3,1\nS1,2\nS2,3\n").unwrap();

        let ids = resolve_ids(
            &path,
            "summary.csv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[("S1", "P2"), ("S2", "P1"), ("S3", "P2")]),
            false,
        );
        assert_eq!(
            ids.patient_id,
            IdField::Many(vec!["P1".to_string(), "P2".to_string()])
        );
    }

    /// Counts orientation reads the header row only.
    #[test]
    fn counts_matrix_header_becomes_samples() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("counts.tsv");
        fs::write(&path, "GeneID\tS1\tS2\nGeneA\t10\t20\n").unwrap();

        let ids = resolve_ids(
            &path,
            "counts.tsv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[]),
            true,
        );
        assert_eq!(
            ids.sample_id,
            IdField::Many(vec!["S1".to_string(), "S2".to_string()])
        );
        assert_eq!(ids.patient_id, IdField::Single(String::new()));
    }

    /// The counts flag only affects tab-delimited tables: a CSV is still
    /// read in standard orientation.
    #[test]
    fn counts_flag_does_not_affect_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("summary.csv");
        fs::write(&path, "Sample,Value\nS1,10\n").unwrap();

        let ids = resolve_ids(
            &path,
            "summary.csv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[]),
            true,
        );
        assert_eq!(ids.sample_id, IdField::Single("S1".to_string()));
    }

    /// A header-only table keeps the filename-derived default.
    #[test]
    fn empty_table_keeps_filename_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.csv");
        fs::write(&path, "Sample,Value\n").unwrap();

        let ids = resolve_ids(
            &path,
            "empty.csv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[]),
            false,
        );
        assert_eq!(ids.sample_id, IdField::Single("empty".to_string()));
    }

    /// Unreadable tables degrade to the filename-derived single sample.
    #[test]
    fn unreadable_table_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.csv");
        fs::write(&path, b"Sample,Value\n\xff\xfe\xfd,1\n").unwrap();

        let ids = resolve_ids(
            &path,
            "broken.csv",
            SUMMARISED_CATEGORY,
            &extensions(),
            &patients(&[("broken", "P7")]),
            false,
        );
        assert_eq!(ids.sample_id, IdField::Single("broken".to_string()));
        assert_eq!(ids.patient_id, IdField::Single("P7".to_string()));
    }

    /// Summarised files in a non-table format (e.g. `.vcf`) never attempt
    /// the tabular path.
    #[test]
    fn non_table_summarised_file_uses_default() {
        let exts = ExtensionMap::new(&[Category {
            name: SUMMARISED_CATEGORY.to_string(),
            extensions: vec![".vcf".to_string()],
        }]);
        let ids = resolve_ids(
            Path::new("/nonexistent/calls.vcf"),
            "calls.vcf",
            SUMMARISED_CATEGORY,
            &exts,
            &patients(&[]),
            false,
        );
        assert_eq!(ids.sample_id, IdField::Single("calls".to_string()));
    }
}
