/// HTML report — a self-contained summary page.
///
/// Renders a stats box (total files, distinct patients, distinct samples,
/// total size) followed by one table per non-empty category, in
/// configuration order.  All dynamic text is escaped; list-valued
/// identifier fields are joined with `", "` for display.
use anyhow::Context;
use datasleuth_core::model::{FileRecord, IdField, ScanResult, FILE_SIZE_UNIT};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const STYLE: &str = "\
<style>
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background-color: #f4f6f8; margin: 0; padding: 20px; color: #333; }
    h1, h2, h3 { color: #2c3e50; }
    table { border-collapse: collapse; width: 100%; margin-bottom: 20px; background-color: white; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
    th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
    th { background-color: #2c3e50; color: white; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    tr:hover { background-color: #f1f1f1; }
    .container { max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
    .summary-box { background-color: #ecf0f1; padding: 20px; border-radius: 6px; margin-bottom: 30px; display: flex; justify-content: space-around; }
    .stat { text-align: center; }
    .stat-val { font-size: 24px; font-weight: bold; color: #2c3e50; }
    .stat-label { font-size: 14px; color: #7f8c8d; text-transform: uppercase; letter-spacing: 0.5px; }
</style>";

/// Render the full report page for a completed scan.
pub fn render_html(result: &ScanResult, location: &str) -> String {
    let mut patients: BTreeSet<&String> = BTreeSet::new();
    let mut samples: BTreeSet<&String> = BTreeSet::new();
    for (_, records) in result.iter() {
        for record in records {
            patients.extend(record.patient_id.values().iter().filter(|p| !p.is_empty()));
            samples.extend(record.sample_id.values().iter().filter(|s| !s.is_empty()));
        }
    }

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html><head><title>Data Summary</title>\n");
    page.push_str(STYLE);
    page.push_str("\n</head><body>\n<div class='container'>\n");
    let _ = writeln!(
        page,
        "<h1>Files Summary</h1><p><strong>Location:</strong> {}</p>",
        escape(location)
    );

    page.push_str("<div class='summary-box'>\n");
    stat(&mut page, &result.file_count().to_string(), "Total Files");
    stat(&mut page, &patients.len().to_string(), "Total Patients");
    stat(&mut page, &samples.len().to_string(), "Total Samples");
    stat(
        &mut page,
        &format!("{} {FILE_SIZE_UNIT}", result.total_size_kb),
        "Total Size",
    );
    page.push_str("</div>\n");

    for (category, records) in result.iter() {
        if records.is_empty() {
            continue;
        }
        let _ = writeln!(page, "<h2>{} Files</h2>", escape(&capitalize(category)));
        page.push_str(
            "<table><tr><th>File Name</th><th>Size (KB)</th><th>Patient ID</th>\
             <th>Sample ID</th><th>Path</th><th>Organization</th></tr>\n",
        );
        for record in records {
            row(&mut page, record);
        }
        page.push_str("</table>\n");
    }

    page.push_str("</div></body></html>\n");
    page
}

/// Write the report page to `path`.
pub fn write_html(path: &Path, result: &ScanResult, location: &str) -> anyhow::Result<()> {
    fs::write(path, render_html(result, location))
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn stat(page: &mut String, value: &str, label: &str) {
    let _ = writeln!(
        page,
        "<div class='stat'><div class='stat-val'>{}</div><div class='stat-label'>{}</div></div>",
        escape(value),
        label
    );
}

fn row(page: &mut String, record: &FileRecord) {
    let _ = writeln!(
        page,
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&record.file_name),
        record.file_size,
        escape(&joined(&record.patient_id)),
        escape(&joined(&record.sample_id)),
        escape(&record.directory),
        escape(&record.organization),
    );
}

/// Display form of an identifier field: lists joined with `", "`.
fn joined(field: &IdField) -> String {
    field.values().join(", ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
