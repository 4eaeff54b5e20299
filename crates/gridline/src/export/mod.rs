//! Spreadsheet, print, and CSV exports.
//!
//! Every export works from an [`ExportRequest`]: a title, the column
//! descriptors, and the records in scope. Only shown columns are projected,
//! in canonical (source field) order. Missing values become empty strings.
//!
//! An export with no records fails with [`ExportError::NoData`] before
//! anything is produced.

mod csv_export;
mod print;
mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

pub use self::csv_export::to_csv;
pub use self::print::{
    print_all, print_current_page, DirectorySurface, PrintDocument, PrintSurface,
};
pub use self::xlsx::{build_sheet, Cell, Sheet, SHEET_NAME};

use crate::columns::{shown_columns, ColumnDescriptor};
use crate::error::ExportError;
use crate::record::Record;

/// Which records an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportScope {
    /// The page currently displayed.
    #[default]
    CurrentPage,
    /// Every record passing the filters, in sorted order.
    AllData,
}

impl ExportScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportScope::CurrentPage => "current page",
            ExportScope::AllData => "all data",
        }
    }
}

/// Inputs for one export invocation.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub scope: ExportScope,
    pub columns: &'a [ColumnDescriptor],
    pub records: Vec<&'a Record>,
    pub title: &'a str,
}

impl<'a> ExportRequest<'a> {
    pub fn new(
        scope: ExportScope,
        columns: &'a [ColumnDescriptor],
        records: Vec<&'a Record>,
        title: &'a str,
    ) -> Self {
        ExportRequest {
            scope,
            columns,
            records,
            title,
        }
    }

    /// Shown columns in canonical order.
    pub fn projected_columns(&self) -> Vec<&'a ColumnDescriptor> {
        shown_columns(self.columns)
    }

    /// Fails with [`ExportError::NoData`] when there is nothing to export.
    pub(crate) fn ensure_rows(&self) -> Result<(), ExportError> {
        if self.records.is_empty() || self.projected_columns().is_empty() {
            return Err(ExportError::NoData);
        }
        Ok(())
    }
}

/// A finished export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, e.g. `Comments.xlsx`.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Writes the artifact into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Builds `<title>.<ext>`, replacing path separators in the title.
pub fn artifact_name(title: &str, ext: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = if stem.trim().is_empty() {
        "export"
    } else {
        stem.as_str()
    };
    format!("{}.{}", stem, ext)
}
