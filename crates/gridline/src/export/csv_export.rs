//! CSV export.

use std::io;

use super::{artifact_name, Artifact, ExportRequest};
use crate::error::ExportError;

/// Writes the request as CSV.
///
/// The header row uses raw field names so the file can be loaded back;
/// cells use the same text as the rendered table.
pub fn to_csv(request: &ExportRequest<'_>) -> Result<Artifact, ExportError> {
    request.ensure_rows()?;
    let columns = request.projected_columns();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.name.as_str()))?;
    for record in &request.records {
        writer.write_record(columns.iter().map(|c| record.cell_text(&c.name)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(io::Error::other(e.to_string())))?;

    Ok(Artifact {
        file_name: artifact_name(request.title, "csv"),
        bytes,
    })
}
