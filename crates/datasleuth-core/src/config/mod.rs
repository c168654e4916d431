/// Dataset configuration — the validated object the scanner consumes.
///
/// The on-disk schema is a `config.json` at the dataset root with three
/// extension lists, a sample→patient mapping, and an optional counts-format
/// flag.  Validation fails loudly with a typed [`ConfigError`] before any
/// scan starts; the scanner itself only ever sees an already-valid
/// [`DatasetConfig`].
///
/// A second, legacy sample→patient mapping may live at a well-known path
/// inside the scanned directory.  It is merged over the configured mapping
/// before scanning, with legacy entries winning on key conflicts.
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Per-dataset configuration file name, resolved at the dataset root.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Well-known location of the legacy sample→patient mapping inside a
/// scanned dataset.
pub const LEGACY_MAPPING_PATH: &str = "sample_metadata/sample_to_patient.json";

/// Organization recorded on records when the caller does not override it.
pub const DEFAULT_ORGANIZATION: &str = "WEHI";

/// Category whose tabular files are introspected for sample identifiers.
pub const SUMMARISED_CATEGORY: &str = "summarised";

/// Configuration loading/validation failures.  All of these are fatal: a
/// dataset with a broken configuration is never scanned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("extension list for '{category}' is empty")]
    EmptyExtensions { category: String },
    #[error("invalid extension '{ext}' for '{category}': must start with a dot")]
    BadExtension { category: String, ext: String },
}

/// One configured file bucket: a name and the extensions it owns.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    /// Dot-prefixed extension strings, possibly compound (`.fastq.gz`).
    pub extensions: Vec<String>,
}

/// Validated configuration handed to [`crate::scanner::scan_dataset`].
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Category buckets in declaration order: raw, processed, summarised,
    /// then any custom categories appended via [`Self::push_category`].
    pub categories: Vec<Category>,
    pub sample_to_patient: HashMap<String, String>,
    /// Treat tab-delimited summary tables as counts matrices (samples in
    /// the header row) instead of sample-per-row tables.
    pub counts_format: bool,
    /// Recorded verbatim on every emitted record.
    pub organization: String,
}

/// On-disk `config.json` schema.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    raw_file_extensions: Vec<String>,
    processed_file_extensions: Vec<String>,
    summarised_file_extensions: Vec<String>,
    #[serde(default)]
    sample_to_patient: HashMap<String, String>,
    #[serde(default)]
    counts_format: bool,
}

impl DatasetConfig {
    /// Load and validate a `config.json`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_parts(file)
    }

    /// The conventional location of `config.json` inside a dataset root.
    pub fn find_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    fn from_parts(file: ConfigFile) -> Result<Self, ConfigError> {
        let categories = vec![
            Category {
                name: "raw".to_string(),
                extensions: file.raw_file_extensions,
            },
            Category {
                name: "processed".to_string(),
                extensions: file.processed_file_extensions,
            },
            Category {
                name: SUMMARISED_CATEGORY.to_string(),
                extensions: file.summarised_file_extensions,
            },
        ];
        for category in &categories {
            validate_extensions(&category.name, &category.extensions)?;
        }
        Ok(Self {
            categories,
            sample_to_patient: file.sample_to_patient,
            counts_format: file.counts_format,
            organization: DEFAULT_ORGANIZATION.to_string(),
        })
    }

    /// Append a custom category after the standard three.
    pub fn push_category(
        &mut self,
        name: impl Into<String>,
        extensions: Vec<String>,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        validate_extensions(&name, &extensions)?;
        self.categories.push(Category { name, extensions });
        Ok(())
    }

    /// Category names in declaration order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// The patient map used for the whole scan: configured entries with the
    /// legacy mapping merged over them, legacy winning on key conflicts.
    pub fn merged_patient_map(
        &self,
        legacy: Option<&HashMap<String, String>>,
    ) -> HashMap<String, String> {
        let mut merged = self.sample_to_patient.clone();
        if let Some(overrides) = legacy {
            for (sample, patient) in overrides {
                merged.insert(sample.clone(), patient.clone());
            }
        }
        merged
    }
}

fn validate_extensions(category: &str, extensions: &[String]) -> Result<(), ConfigError> {
    if extensions.is_empty() {
        return Err(ConfigError::EmptyExtensions {
            category: category.to_string(),
        });
    }
    for ext in extensions {
        if !ext.starts_with('.') {
            return Err(ConfigError::BadExtension {
                category: category.to_string(),
                ext: ext.clone(),
            });
        }
    }
    Ok(())
}

/// Load the legacy sample→patient mapping from its well-known path inside
/// `root`, if present.
///
/// A missing file is not an error — there are simply no override entries.
/// A malformed file is logged and treated the same way; only a broken root
/// directory aborts a scan.
pub fn load_legacy_mapping(root: &Path) -> Option<HashMap<String, String>> {
    let path = root.join(LEGACY_MAPPING_PATH);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return None,
    };
    match serde_json::from_str(&text) {
        Ok(mapping) => Some(mapping),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring malformed legacy mapping");
            None
        }
    }
}
