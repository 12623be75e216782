//! Output formatting and persistence for grades and reports.
//!
//! Supports JSON rendering and CSV append for grade entry.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::records::Grade;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Renders any report as pretty-printed JSON.
pub fn render_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Appends a [`Grade`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_grade(path: &str, grade: &Grade) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending grade record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(grade)?;
    writer.flush()?;

    Ok(())
}
