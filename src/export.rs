use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExportError;
use crate::grouping::LabelGroups;

// Write each label group to `{base_dir}/{label}.csv`, overwriting existing files.
pub fn export(groups: &LabelGroups, base_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(base_dir)?;

    let field_set = groups.field_set();
    let mut written = Vec::with_capacity(groups.len());

    for (label, rows) in groups.iter() {
        // Label is used verbatim as the file stem.
        let path = base_dir.join(format!("{}.csv", label));

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_path(&path)?;

        writer.write_record(field_set.headers())?;
        for row in rows {
            writer.write_record(row.record(field_set))?;
        }
        writer.flush()?;

        debug!(label, rows = rows.len(), path = %path.display(), "wrote label file");
        written.push(path);
    }

    Ok(written)
}
