/// Dataset scanner — walks a directory tree and builds per-category records.
///
/// The walk is a single pass: every regular file is classified by extension,
/// sized, resolved to sample/patient identifiers, and appended to its
/// category bucket.  `jwalk`'s rayon-backed traversal fans the directory
/// reads out across a thread pool; all accumulation happens at the single
/// merge point in the scan loop, so no ordering guarantee exists between
/// files and none is needed.
///
/// Failure policy: only a missing root directory is fatal.  Unreadable
/// entries are counted and skipped, unparseable summary tables degrade to
/// filename-derived identifiers, and files matching no configured extension
/// are silently excluded.
use crate::classify::{is_hidden, ExtensionMap};
use crate::config::{load_legacy_mapping, DatasetConfig};
use crate::model::{size_kb, FileRecord, ScanResult};
use crate::resolve::resolve_ids;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Scan failures.  Everything short of a broken root degrades per-file.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("dataset root '{}' does not exist or is not a directory", path.display())]
    RootNotFound { path: PathBuf },
}

/// Scan `root` recursively and group every classified file by category.
///
/// The legacy sample→patient mapping, when present inside `root`, is merged
/// over the configured mapping before the walk begins (legacy entries win).
/// Holds no state across invocations: scanning the same unchanged tree twice
/// yields the same category contents and total, record order aside.
pub fn scan_dataset(root: &Path, config: &DatasetConfig) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let extensions = ExtensionMap::new(&config.categories);
    let legacy = load_legacy_mapping(root);
    let patients = config.merged_patient_map(legacy.as_ref());

    let mut result = ScanResult::with_categories(config.category_names());
    let mut error_count: u64 = 0;

    debug!(root = %root.display(), "scanning dataset");

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                error_count += 1;
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();

        // Hidden files are excluded before any classification attempt.
        if is_hidden(&file_name) {
            continue;
        }

        let Some(category) = extensions.classify(&file_name) else {
            continue;
        };

        let path = entry.path();
        let size_bytes = match std::fs::symlink_metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                error_count += 1;
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };
        let file_size = size_kb(size_bytes);

        let ids = resolve_ids(
            &path,
            &file_name,
            category,
            &extensions,
            &patients,
            config.counts_format,
        );

        let directory = match path.strip_prefix(root) {
            Ok(relative) => format!("./{}", relative.display()),
            Err(_) => file_name.clone(),
        };

        debug!(category, file = %file_name, size_kb = file_size, "classified file");

        result.push(
            category,
            FileRecord {
                file_name,
                file_size,
                directory,
                organization: config.organization.clone(),
                sample_id: ids.sample_id,
                patient_id: ids.patient_id,
            },
        );
    }

    debug!(
        files = result.file_count(),
        total_kb = result.total_size_kb,
        errors = error_count,
        "scan complete"
    );

    Ok(result)
}
