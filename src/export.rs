use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::tagging::BatchRow;

/// Writes a header row then one record per row: mode, original URL, tagged URL.
pub fn write_csv<W: Write>(rows: &[BatchRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    if rows.is_empty() {
        wtr.write_record(["mode", "original_url", "tagged_url"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_bytes(rows: &[BatchRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

pub fn save_csv(path: &str, rows: &[BatchRow]) -> Result<()> {
    let path_ref = Path::new(path);
    if let Some(parent) = path_ref.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            debug!("Creating directory structure: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }

    let file =
        File::create(path_ref).with_context(|| format!("Failed to create CSV file: {}", path))?;
    write_csv(rows, file).with_context(|| format!("Failed to write CSV file: {}", path))?;
    info!("Wrote {} row(s) to {}", rows.len(), path);
    Ok(())
}

/// Tab-separated listing for the terminal
pub fn render_table(rows: &[BatchRow]) -> String {
    let mut out = String::from("mode\toriginal_url\ttagged_url\n");
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            row.mode, row.original_url, row.tagged_url
        ));
    }
    out
}
