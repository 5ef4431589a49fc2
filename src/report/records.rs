use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ManifestError, Result};
use crate::models::LicenseEntry;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Column names of the record file, in output order.
pub const HEADER: [&str; 13] = [
    "Category",
    "Subcategory",
    "Name",
    "Version",
    "Url",
    "Modified",
    "Owner",
    "Reviewer",
    "License",
    "License Url",
    "Notes",
    "Text",
    "Status",
];

/// Appends license rows to the structured-record file.
///
/// [`init`](Self::init) truncates the file and writes the header once per run;
/// every later call is a no-op. Rows are appended and flushed one at a time, so
/// a run that aborts leaves every row written so far on disk.
#[derive(Debug)]
pub struct RecordWriter {
    path: PathBuf,
    file: Option<File>,
    initialized: bool,
    rows: usize,
}

impl RecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            initialized: false,
            rows: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended in this run, excluding the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Create the parent directory, truncate the file, and write the header.
    ///
    /// Rows appended before the first `init` are discarded with the truncation.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        let init_err = |source| ManifestError::OutputInit {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(init_err)?;
        }
        let mut file = File::create(&self.path).map_err(init_err)?;
        file.write_all(format_row(&HEADER).as_bytes())
            .map_err(init_err)?;
        self.file = Some(file);
        self.initialized = true;
        self.rows = 0;
        Ok(())
    }

    /// Append one row. Without a prior `init` the file is opened for append
    /// as-is, with no header.
    pub fn append(&mut self, entry: &LicenseEntry) -> Result<()> {
        let line = format_row(&entry.fields());
        let write_err = |source| ManifestError::RecordWrite {
            path: self.path.clone(),
            source,
        };

        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(write_err)?,
        };
        let file = self.file.insert(file);
        file.write_all(line.as_bytes()).map_err(write_err)?;
        self.rows += 1;
        Ok(())
    }
}

/// Join fields with commas, quoting any field that contains a comma, and end
/// the line. Embedded quotes are written as-is.
pub fn format_row(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str(LINE_ENDING);
    line
}

fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains(',') {
        format!("\"{}\"", field).into()
    } else {
        field.into()
    }
}
