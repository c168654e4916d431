/// JSON report document.
///
/// The output is a nested document consumed by the HTML viewer and by
/// downstream registries:
///
/// ```json
/// {
///   "data": {
///     "location": "/path/to/dataset",
///     "file_size_unit": "KB",
///     "files": { "raw": [...], "processed": [...], "summarised": [...] }
///   }
/// }
/// ```
use anyhow::Context;
use datasleuth_core::model::{ScanResult, FILE_SIZE_UNIT};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct Document<'a> {
    data: Data<'a>,
}

#[derive(Serialize)]
struct Data<'a> {
    location: String,
    file_size_unit: &'static str,
    files: &'a ScanResult,
}

/// Render the report document as pretty-printed JSON.
///
/// Serialized directly from the result so the category order in `files`
/// matches the configuration order.
pub fn render_json(result: &ScanResult, location: &Path) -> anyhow::Result<String> {
    let document = Document {
        data: Data {
            location: location.display().to_string(),
            file_size_unit: FILE_SIZE_UNIT,
            files: result,
        },
    };
    serde_json::to_string_pretty(&document).context("serializing report document")
}

/// Write the report document to `path`.
pub fn write_json(path: &Path, result: &ScanResult, location: &Path) -> anyhow::Result<()> {
    let rendered = render_json(result, location)?;
    fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
